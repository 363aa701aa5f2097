// CSS class names shared by the views and the stylesheet.

pub const BUTTON: &str = "btn";
pub const BUTTON_SECONDARY: &str = "btn btn-secondary";
pub const CARD: &str = "card";
pub const PROGRESS: &str = "progress";

// State classes
pub const CORRECT: &str = "correct";
pub const INCORRECT: &str = "incorrect";
pub const REVEALED: &str = "is-revealed";
pub const ERROR: &str = "error";

pub const FEEDBACK_CORRECT: &str = "feedback-correct";
pub const FEEDBACK_INCORRECT: &str = "feedback-incorrect";

/// Class list for a card that may carry one extra state class.
pub fn with_state(base: &str, state: Option<&str>) -> String {
    match state {
        Some(state) => format!("{} {}", base, state),
        None => base.to_string(),
    }
}
