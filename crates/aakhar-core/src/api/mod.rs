//! Data access over HTTP.
//!
//! This module provides the `Fetch` transport trait with its reqwest-backed
//! `HttpNetwork`, and the `DataClient` that loads the category manifest,
//! per-category vocabulary datasets and derives image paths.

pub mod client;
pub mod error;
pub mod http;

pub use client::{image_path_for, AssetPaths, DataClient};
pub use error::FetchError;
pub use http::{Fetch, HttpNetwork, Response};
