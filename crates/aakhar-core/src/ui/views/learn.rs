//! Flashcards: one card at a time with previous/next navigation.

use futures::future::{BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::api::Fetch;
use crate::app::AppContext;
use crate::models::{Category, Deck, Language, VocabularyEntry};
use crate::ui::router::View;
use crate::ui::{markup, styles, Action, ContainerHandle, ViewError};
use crate::utils::escape_html;

use super::{find_category, load_deck};

enum LearnState {
    Selecting(Vec<Category>),
    Studying { deck: Deck, index: usize },
    Unavailable,
}

pub struct LearnView {
    out: ContainerHandle,
    rng: StdRng,
    state: LearnState,
}

impl LearnView {
    pub fn new(out: ContainerHandle) -> Self {
        Self::with_rng(out, StdRng::from_entropy())
    }

    pub fn with_rng(out: ContainerHandle, rng: StdRng) -> Self {
        Self {
            out,
            rng,
            state: LearnState::Selecting(Vec::new()),
        }
    }

    pub fn deck(&self) -> Option<&Deck> {
        match &self.state {
            LearnState::Studying { deck, .. } => Some(deck),
            _ => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            LearnState::Studying { index, .. } => Some(index),
            _ => None,
        }
    }

    async fn show_selector<F: Fetch>(&mut self, ctx: &AppContext<F>) {
        let categories = ctx.data.fetch_category_list().await;
        self.out.render(markup::category_selector(
            "Learn",
            "Please select a category to start learning.",
            &categories,
        ));
        self.state = LearnState::Selecting(categories);
    }

    async fn select<F: Fetch>(&mut self, ctx: &AppContext<F>, id: &str) -> Result<(), ViewError> {
        let LearnState::Selecting(categories) = &self.state else {
            return Ok(());
        };
        let category = find_category(categories, id);

        let Some(deck) = load_deck(ctx, &self.out, category).await else {
            return Ok(());
        };
        if deck.is_empty() {
            self.state = LearnState::Unavailable;
            self.out.render(markup::message_card(markup::COULD_NOT_LOAD));
            return Ok(());
        }

        self.state = LearnState::Studying { deck, index: 0 };
        self.render_card(ctx)
    }

    /// Move one card. Stepping past either end changes nothing.
    fn step<F: Fetch>(&mut self, ctx: &AppContext<F>, forward: bool) -> Result<bool, ViewError> {
        let LearnState::Studying { deck, index } = &mut self.state else {
            return Ok(false);
        };
        let target = if forward {
            Some(*index + 1).filter(|i| *i < deck.len())
        } else {
            index.checked_sub(1)
        };
        match target {
            Some(i) => {
                *index = i;
                self.render_card(ctx)?;
            }
            None => debug!(index = *index, "Already at the end of the deck"),
        }
        Ok(true)
    }

    fn shuffle<F: Fetch>(&mut self, ctx: &AppContext<F>) -> Result<bool, ViewError> {
        let LearnState::Studying { deck, index } = &mut self.state else {
            return Ok(false);
        };
        deck.shuffle(&mut self.rng);
        *index = 0;
        self.render_card(ctx)?;
        Ok(true)
    }

    fn render_card<F: Fetch>(&self, ctx: &AppContext<F>) -> Result<(), ViewError> {
        let LearnState::Studying { deck, index } = &self.state else {
            return Err(ViewError::render("learn", "no deck loaded"));
        };
        let entry = deck
            .get(*index)
            .ok_or_else(|| ViewError::render("learn", format!("card {} out of range", index)))?;

        let html = format!(
            "<div class=\"flashcard-view\">\
             <div class=\"flashcard-nav\">{}<span class=\"{}\">Card {} of {}</span></div>\
             <div class=\"card flashcard-content-wrapper\"><h2>{}</h2>\
             <img class=\"flashcard-img\" src=\"{}\" alt=\"{}\">{}</div>\
             <div class=\"flashcard-controls\">{}{}{}</div>\
             </div>",
            markup::button("learn-back-btn", "&larr; Back to Categories", false),
            styles::PROGRESS,
            index + 1,
            deck.len(),
            escape_html(&deck.category().title),
            escape_html(&ctx.data.image_path_for(&entry.english)),
            escape_html(&entry.english),
            translation_table(entry),
            markup::button("prev-btn", "&larr; Previous", *index == 0),
            markup::button("shuffle-btn", "Shuffle", false),
            markup::button("next-btn", "Next &rarr;", *index + 1 == deck.len()),
        );
        self.out.render(html);
        Ok(())
    }
}

fn translation_table(entry: &VocabularyEntry) -> String {
    let mut rows = String::new();
    let mut row = |label: &str, value: &str| {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            label,
            escape_html(value)
        ));
    };

    if let Some(annotation) = entry.annotation() {
        row(annotation.label(), annotation.value());
    }
    row("English", &entry.english);
    for language in Language::ALL {
        row(language.name(), entry.display_text(language));
    }

    format!("<table class=\"translations-table\"><tbody>{}</tbody></table>", rows)
}

impl<F: Fetch> View<F> for LearnView {
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
            match action {
                Action::Select(id) if matches!(self.state, LearnState::Selecting(_)) => {
                    self.select(ctx, &id).await?;
                    Ok(true)
                }
                Action::Next => self.step(ctx, true),
                Action::Previous => self.step(ctx, false),
                Action::Shuffle => self.shuffle(ctx),
                Action::Back if !matches!(self.state, LearnState::Selecting(_)) => {
                    self.show_selector(ctx).await;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        .boxed()
    }
}
