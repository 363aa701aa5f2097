//! Ten-question multiple-choice quiz.
//!
//! Setup -> (loading) -> InsufficientData | Active -> Results -> Setup.
//! Quitting an active quiz discards it and returns to setup.

use futures::future::{BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::api::Fetch;
use crate::app::AppContext;
use crate::models::{
    Advance, AnswerOutcome, Category, InsufficientData, Language, QuizResults, QuizSession,
    QUIZ_LENGTH,
};
use crate::ui::router::View;
use crate::ui::{markup, styles, Action, ContainerHandle, ViewError};
use crate::utils::escape_html;

use super::find_category;

const LOADING_QUIZ: &str = "Loading quiz...";

pub enum QuizState {
    Setup(Vec<Category>),
    InsufficientData(InsufficientData),
    Active(QuizSession),
    Results(QuizResults),
}

pub struct QuizView {
    out: ContainerHandle,
    rng: StdRng,
    state: QuizState,
}

impl QuizView {
    pub fn new(out: ContainerHandle) -> Self {
        Self::with_rng(out, StdRng::from_entropy())
    }

    pub fn with_rng(out: ContainerHandle, rng: StdRng) -> Self {
        Self {
            out,
            rng,
            state: QuizState::Setup(Vec::new()),
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Active(session) => Some(session),
            _ => None,
        }
    }

    async fn show_setup<F: Fetch>(&mut self, ctx: &AppContext<F>) {
        let categories = ctx.data.fetch_category_list().await;
        self.out.render(setup_markup(&categories));
        self.state = QuizState::Setup(categories);
    }

    async fn start<F: Fetch>(
        &mut self,
        ctx: &AppContext<F>,
        category: &str,
        language: Language,
    ) -> Result<bool, ViewError> {
        if !Language::QUIZ_TARGETS.contains(&language) {
            debug!(%language, "Not a quiz language");
            return Ok(false);
        }

        let QuizState::Setup(categories) = &self.state else {
            return Ok(false);
        };
        let category = find_category(categories, category).id;

        self.out.render(markup::message_card(LOADING_QUIZ));
        let entries = ctx.data.fetch_category_data(&category).await;
        if !self.out.is_current() {
            debug!(%category, "Navigation moved on, dropping quiz data");
            return Ok(true);
        }

        match QuizSession::start(&entries, language, &mut self.rng) {
            Ok(session) => {
                info!(%category, %language, "Quiz started");
                self.state = QuizState::Active(session);
                self.render_question()?;
            }
            Err(insufficient) => {
                debug!(%category, error = %insufficient, "Not enough data for a quiz");
                self.out.render(insufficient_markup(&insufficient));
                self.state = QuizState::InsufficientData(insufficient);
            }
        }
        Ok(true)
    }

    fn answer(&mut self, option: usize) -> Result<bool, ViewError> {
        let QuizState::Active(session) = &mut self.state else {
            return Ok(false);
        };
        match session.answer(option) {
            Some(AnswerOutcome::Correct) => debug!(option, "Correct answer"),
            Some(AnswerOutcome::Incorrect { correct_index }) => {
                debug!(option, correct_index, "Incorrect answer")
            }
            // Already answered, or no such option
            None => return Ok(false),
        }
        self.render_question()?;
        Ok(true)
    }

    fn advance(&mut self) -> Result<bool, ViewError> {
        let QuizState::Active(session) = &mut self.state else {
            return Ok(false);
        };
        match session.advance() {
            Advance::Locked => Ok(false),
            Advance::Question(_) => {
                self.render_question()?;
                Ok(true)
            }
            Advance::Finished => {
                let results = session.results();
                info!(score = results.score, language = %results.language, "Quiz finished");
                self.out.render(results_markup(&results));
                self.state = QuizState::Results(results);
                Ok(true)
            }
        }
    }

    fn render_question(&self) -> Result<(), ViewError> {
        let QuizState::Active(session) = &self.state else {
            return Err(ViewError::render("quiz", "no active quiz"));
        };
        let question = session.current().ok_or_else(|| {
            ViewError::render("quiz", format!("question {} out of range", session.current_index()))
        })?;

        let selected = session.selected();
        let correct_index = question.correct_index();

        let mut options = String::new();
        for (i, option) in question.options.iter().enumerate() {
            let state = match selected {
                Some(_) if Some(i) == correct_index => Some(styles::CORRECT),
                Some(choice) if choice == i => Some(styles::INCORRECT),
                _ => None,
            };
            options.push_str(&format!(
                "<button class=\"{}\" data-value=\"{}\"{}>{}. {}</button>",
                styles::with_state("quiz-option-btn", state),
                escape_html(option),
                if selected.is_some() { " disabled" } else { "" },
                i + 1,
                escape_html(option)
            ));
        }

        let feedback = match selected {
            None => String::new(),
            Some(choice) if Some(choice) == correct_index => {
                format!("<p class=\"{}\">Correct!</p>", styles::FEEDBACK_CORRECT)
            }
            Some(_) => format!("<p class=\"{}\">Sorry, that's not right.</p>", styles::FEEDBACK_INCORRECT),
        };
        let next = if selected.is_some() {
            markup::button("next-question-btn", "Next", false)
        } else {
            String::new()
        };
        let hindi = question
            .prompt
            .hindi
            .as_deref()
            .map(|h| format!("<p>({})</p>", escape_html(h)))
            .unwrap_or_default();

        self.out.render(format!(
            "<div class=\"quiz-view\">\
             <div class=\"quiz-header\"><p class=\"{}\">Question {} of {}</p>\
             <p id=\"quiz-score\">Score: {}</p>{}</div>\
             <div class=\"card quiz-question-card\"><p>What is the {} for:</p><h2>{}</h2>{}</div>\
             <div class=\"quiz-options-grid\">{}</div>\
             <div id=\"quiz-feedback-area\">{}</div>{}\
             </div>",
            styles::PROGRESS,
            session.current_index() + 1,
            QUIZ_LENGTH,
            session.score(),
            markup::button("quit-quiz-btn", "Quit", false),
            session.language(),
            escape_html(&question.prompt.english),
            hindi,
            options,
            feedback,
            next
        ));
        Ok(())
    }
}

fn setup_markup(categories: &[Category]) -> String {
    if categories.is_empty() {
        return format!(
            "{}{}",
            markup::titled_card("Take a Quiz", ""),
            markup::message_card(markup::COULD_NOT_LOAD_CATEGORIES)
        );
    }

    let category_options: String = categories
        .iter()
        .map(|c| {
            format!(
                "<option value=\"{}\">{}</option>",
                escape_html(&c.id),
                escape_html(&c.title)
            )
        })
        .collect();
    let language_options: String = Language::QUIZ_TARGETS
        .iter()
        .map(|l| format!("<option value=\"{0}\">{0}</option>", l))
        .collect();

    format!(
        "<div class=\"card quiz-setup-container\"><h2>Take a Quiz</h2>\
         <p>Select a category and a language to start your {}-question quiz.</p>\
         <form id=\"quiz-setup-form\">\
         <div class=\"form-group\"><p>1. Choose a Category:</p>\
         <select id=\"category-select\" required>{}</select></div>\
         <div class=\"form-group\"><p>2. Choose a Language to Test:</p>\
         <select id=\"language-select\" required>{}</select></div>\
         {}</form></div>",
        QUIZ_LENGTH,
        category_options,
        language_options,
        markup::button("start-quiz-btn", "Start Quiz", false)
    )
}

fn insufficient_markup(insufficient: &InsufficientData) -> String {
    markup::titled_card(
        "Not Enough Data",
        &format!(
            "{}{}",
            markup::paragraph(&format!(
                "Sorry, there isn't enough data for the \"{}\" language in this category to \
                 generate a {}-question quiz.",
                insufficient.language, insufficient.required
            )),
            markup::button("quiz-back-btn", "Back to Setup", false)
        ),
    )
}

fn results_markup(results: &QuizResults) -> String {
    format!(
        "<div class=\"card quiz-results-view\"><h2>Quiz Complete!</h2>\
         <p>Your language: <strong>{}</strong></p>\
         <div class=\"final-score\">You scored:</div>\
         <div class=\"final-score-number\">{} / {}</div>\
         <div class=\"final-score-percent\">({}%)</div>\
         <p class=\"final-message\">\"{}\"</p>\
         <div class=\"quiz-results-controls\">{}</div></div>",
        results.language,
        results.score,
        results.total,
        results.percentage(),
        escape_html(results.tier().message()),
        markup::button("quiz-back-btn", "Back to Setup", false)
    )
}

impl<F: Fetch> View<F> for QuizView {
    fn enter<'a>(&'a mut self, ctx: &'a AppContext<F>) -> BoxFuture<'a, Result<(), ViewError>> {
        async move {
            self.show_setup(ctx).await;
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
                Action::Start { category, language } if matches!(self.state, QuizState::Setup(_)) => {
                    self.start(ctx, &category, language).await?
                }
                Action::Answer(option) => self.answer(option)?,
                Action::Continue => self.advance()?,
                Action::Quit if matches!(self.state, QuizState::Active(_)) => {
                    info!("Quiz abandoned");
                    self.show_setup(ctx).await;
                    true
                }
                Action::Back | Action::Quit
                    if matches!(self.state, QuizState::InsufficientData(_) | QuizState::Results(_)) =>
                {
                    self.show_setup(ctx).await;
                    true
                }
                _ => false,
            };
            Ok(handled)
        }
        .boxed()
    }
}
