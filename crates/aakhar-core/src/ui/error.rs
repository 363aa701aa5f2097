use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Failed to render {view}: {reason}")]
    Render { view: &'static str, reason: String },
}

impl ViewError {
    pub fn render(view: &'static str, reason: impl Into<String>) -> Self {
        ViewError::Render {
            view,
            reason: reason.into(),
        }
    }
}
