//! Offline cache: versioned on-disk response stores and the worker that
//! intercepts requests in front of the network.
//!
//! Two stores exist per version: a static store holding the precached app
//! shell, and a dynamic store filled lazily with data and image responses.
//! Bumping the configured cache version is the only way to refresh the shell.

mod error;
mod registration;
mod storage;
pub(crate) mod worker;

pub use error::CacheError;
pub use registration::Registration;
pub use storage::{CacheStorage, CacheStore, CachedData, StoredResponse};
pub use worker::{OfflineCache, Strategy, WorkerSettings, WorkerState};
