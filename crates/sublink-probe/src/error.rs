//! Error types for probe transports.

use thiserror::Error;

/// Failure of one transport attempt against a subscription URL.
///
/// Every variant is retryable; content-level rejection is not an error
/// (the validator returns `false` for it without retrying).
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// Connection failure, timeout, or any other transport-level error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint responded with a non-2xx status.
    #[error("unexpected status: {0}")]
    Status(u16),
}
