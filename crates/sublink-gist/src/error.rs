//! Error types for the gist gateway.

use thiserror::Error;

/// Result type alias for gist operations.
pub type GistResult<T> = Result<T, GistError>;

/// Errors that can occur talking to the gist API.
#[derive(Debug, Error)]
pub enum GistError {
    #[error("http error: {0}")]
    Http(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("failed to decode gist response: {0}")]
    Decode(String),
}
