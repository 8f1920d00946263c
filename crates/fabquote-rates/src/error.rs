//! Error types for rate fetching.
//!
//! A failed refresh never touches the active table; the caller keeps
//! pricing against the previous rates and may retry later.

use thiserror::Error;

/// Rate sheet retrieval and validation errors.
#[derive(Debug, Error)]
pub enum RateError {
    /// The remote request failed (connect, timeout, non-2xx, bad body).
    #[error("rate source request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The sheet arrived but is unusable (no valid quotes).
    #[error("rate sheet rejected: {0}")]
    Sheet(String),
}

/// Convenience type alias for Results with RateError.
pub type RateResult<T> = Result<T, RateError>;
