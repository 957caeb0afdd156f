//! Error types for page fetching and extraction

use thiserror::Error;

/// Result type for Stage Identity operations
pub type Result<T> = std::result::Result<T, StageError>;

/// Error types surfaced by the fetch stage and the engine boundary
#[derive(Error, Debug)]
pub enum StageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("HTTP error {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Extraction aborted: {0}")]
    Internal(String),
}
