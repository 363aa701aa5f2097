//! Core library for Aakhar, an offline-first Uttarakhandi vocabulary trainer.
//!
//! Provides the vocabulary data model, the data client, the offline response
//! cache with its install/activate lifecycle, the fragment router and the
//! learn, recall and quiz controllers. Hosts (the `aakhar` CLI) only supply
//! input and display the rendered container.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod install;
pub mod models;
pub mod ui;
pub mod utils;

pub use api::{DataClient, Fetch, FetchError, HttpNetwork, Response};
pub use app::{App, AppContext, AppFetch};
pub use cache::{CacheError, CacheStorage, OfflineCache, Registration, WorkerState};
pub use config::{Config, ImageExtension};
pub use install::{DeferredPrompt, InstallBridge, InstallOutcome};
pub use ui::{Action, Route, Router};
