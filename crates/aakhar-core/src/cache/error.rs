use thiserror::Error;

use super::WorkerState;
use crate::api::FetchError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to precache {url}: {source}")]
    Precache {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Cannot {action} a worker that is {state:?}")]
    InvalidState {
        action: &'static str,
        state: WorkerState,
    },
}
