//! Error types for the subscription registry.

use thiserror::Error;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while serializing or deserializing the registry.
///
/// Load paths in this crate never surface `Parse` to a run — callers get an
/// empty registry instead — but the kind is exposed so tests can assert on it.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse registry document: {0}")]
    Parse(String),

    #[error("failed to serialize registry document: {0}")]
    Serialize(String),
}
