//! Recall: the whole deck as tap-to-reveal cards.

use futures::future::{BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::api::Fetch;
use crate::app::AppContext;
use crate::models::{Category, Deck, Language};
use crate::ui::router::View;
use crate::ui::{markup, styles, Action, ContainerHandle, ViewError};
use crate::utils::escape_html;

use super::{find_category, load_deck};

enum RecallState {
    Selecting(Vec<Category>),
    Reviewing { deck: Deck, revealed: Vec<bool> },
    Unavailable,
}

pub struct RecallView {
    out: ContainerHandle,
    rng: StdRng,
    state: RecallState,
}

impl RecallView {
    pub fn new(out: ContainerHandle) -> Self {
        Self::with_rng(out, StdRng::from_entropy())
    }

    pub fn with_rng(out: ContainerHandle, rng: StdRng) -> Self {
        Self {
            out,
            rng,
            state: RecallState::Selecting(Vec::new()),
        }
    }

    pub fn deck(&self) -> Option<&Deck> {
        match &self.state {
            RecallState::Reviewing { deck, .. } => Some(deck),
            _ => None,
        }
    }

    pub fn revealed(&self) -> &[bool] {
        match &self.state {
            RecallState::Reviewing { revealed, .. } => revealed,
            _ => &[],
        }
    }

    async fn show_selector<F: Fetch>(&mut self, ctx: &AppContext<F>) {
        let categories = ctx.data.fetch_category_list().await;
        self.out.render(markup::category_selector(
            "Recall",
            "Please select a category to test your memory.",
            &categories,
        ));
        self.state = RecallState::Selecting(categories);
    }

    async fn select<F: Fetch>(&mut self, ctx: &AppContext<F>, id: &str) {
        let RecallState::Selecting(categories) = &self.state else {
            return;
        };
        let category = find_category(categories, id);

        let Some(deck) = load_deck(ctx, &self.out, category).await else {
            return;
        };
        if deck.is_empty() {
            self.state = RecallState::Unavailable;
            self.out.render(markup::message_card(markup::COULD_NOT_LOAD));
            return;
        }

        let revealed = vec![false; deck.len()];
        self.state = RecallState::Reviewing { deck, revealed };
        self.render();
    }

    fn toggle(&mut self, position: usize) -> bool {
        let RecallState::Reviewing { revealed, .. } = &mut self.state else {
            return false;
        };
        let Some(card) = revealed.get_mut(position) else {
            debug!(position, "No recall card at position");
            return false;
        };
        *card = !*card;
        self.render();
        true
    }

    /// Reorder the cards and hide them all again.
    fn shuffle(&mut self) -> bool {
        let RecallState::Reviewing { deck, revealed } = &mut self.state else {
            return false;
        };
        deck.shuffle(&mut self.rng);
        revealed.fill(false);
        self.render();
        true
    }

    fn render(&self) {
        let RecallState::Reviewing { deck, revealed } = &self.state else {
            return;
        };

        let mut cards = String::new();
        for (i, (entry, shown)) in deck.entries().iter().zip(revealed).enumerate() {
            let class = styles::with_state("card recall-card", shown.then_some(styles::REVEALED));
            cards.push_str(&format!(
                "<div class=\"{}\" tabindex=\"0\"><h3>{}. {}</h3>",
                class,
                i + 1,
                escape_html(&entry.english)
            ));
            if *shown {
                for language in Language::ALL {
                    cards.push_str(&format!(
                        "<p>{}: {}</p>",
                        language.name(),
                        escape_html(entry.display_text(language))
                    ));
                }
            }
            cards.push_str("</div>");
        }

        self.out.render(format!(
            "<div class=\"recall-view\">\
             <div class=\"recall-nav\">{}{}<span class=\"{}\">{}</span></div>\
             <div class=\"recall-grid\">{}</div>\
             </div>",
            markup::button("recall-back-btn", "&larr; Back", false),
            markup::button("shuffle-btn", "Shuffle", false),
            styles::PROGRESS,
            escape_html(&deck.category().title),
            cards
        ));
    }
}

impl<F: Fetch> View<F> for RecallView {
    fn enter<'a>(&'a mut self, ctx: &'a AppContext<F>) -> BoxFuture<'a, Result<(), ViewError>> {
        async move {
            self.show_selector(ctx).await;
            Ok(())
        }
        .boxed()
    }

    fn handle<'a>(
        &'a mut self,
        ctx: &'a AppContext<F>,
        action: Action,
    ) -> BoxFuture<'a, Result<bool, ViewError>> {
        async move {
            let handled = match action {
                Action::Select(id) if matches!(self.state, RecallState::Selecting(_)) => {
                    self.select(ctx, &id).await;
                    true
                }
                Action::Toggle(position) => self.toggle(position),
                Action::Shuffle => self.shuffle(),
                Action::Back if !matches!(self.state, RecallState::Selecting(_)) => {
                    self.show_selector(ctx).await;
                    true
                }
                _ => false,
            };
            Ok(handled)
        }
        .boxed()
    }
}
