//! Core errors.

use thiserror::Error;

/// Errors raised at the edges of the core: loading captures and fetching
/// response content. Classification and extraction never fail.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Content fetch failed: {0}")]
    ContentFetch(String),

    #[error("Invalid HAR document: {0}")]
    InvalidHar(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
