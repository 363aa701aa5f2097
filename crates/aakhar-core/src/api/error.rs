use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Offline - {0} is unreachable")]
    Offline(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not available offline: {0}")]
    NotCached(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: u16, url: &str, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status {
            404 | 410 => FetchError::NotFound(url.to_string()),
            500..=599 => FetchError::ServerError(format!("{} ({}): {}", url, status, truncated)),
            _ => FetchError::InvalidResponse(format!("Status {} from {}: {}", status, url, truncated)),
        }
    }

    /// True when the failure means the network could not be reached at all,
    /// as opposed to the server answering with something unusable.
    pub fn is_unreachable(&self) -> bool {
        match self {
            FetchError::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            FetchError::Offline(_) => true,
            _ => false,
        }
    }
}
