//! Utility functions for markup, text formatting and shuffling.

pub mod format;
pub mod random;

// Re-export commonly used functions at module level
pub use format::{capitalize, escape_html, strip_html};
pub use random::{sample, shuffled};
