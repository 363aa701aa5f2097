//! Page controllers, one per route.

mod about;
mod home;
mod learn;
mod quiz;
mod recall;
mod uttarakhand;

pub use about::AboutView;
pub use home::HomeView;
pub use learn::LearnView;
pub use quiz::{QuizState, QuizView};
pub use recall::RecallView;
pub use uttarakhand::UttarakhandView;

use tracing::debug;

use crate::api::Fetch;
use crate::app::AppContext;
use crate::models::{Category, Deck};

use super::{markup, ContainerHandle};

/// The listed category an id typed by the user refers to, ignoring case.
/// Ids missing from the list are still tried as given.
fn find_category(categories: &[Category], id: &str) -> Category {
    categories
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(id))
        .cloned()
        .unwrap_or_else(|| Category::from_id(id.to_ascii_lowercase()))
}

/// Fetch a category into a deck, showing the loading card meanwhile.
///
/// Returns `None` when the navigation moved on before the data arrived; the
/// caller must then leave both its state and the container alone.
async fn load_deck<F: Fetch>(
    ctx: &AppContext<F>,
    out: &ContainerHandle,
    category: Category,
) -> Option<Deck> {
    out.render(markup::message_card(markup::LOADING_CATEGORY));
    let entries = ctx.data.fetch_category_data(&category.id).await;
    if !out.is_current() {
        debug!(category = %category.id, "Navigation moved on, dropping loaded category");
        return None;
    }
    Some(Deck::new(category, entries))
}
