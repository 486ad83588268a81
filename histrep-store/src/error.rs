//! Error types for histrep-store.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from snapshot storage operations.
///
/// "Object does not exist" is *not* an error: [`crate::SnapshotStore::fetch`]
/// reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network / throttling style failure; eligible for retry.
    #[error("transient storage failure on {locator}: {message}")]
    Transient { locator: String, message: String },

    /// Non-retryable backend failure.
    #[error("storage failure on {locator}: {message}")]
    Fatal { locator: String, message: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A transient failure survived every retry attempt.
    #[error("storage retries exhausted after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<StoreError>,
    },

    /// One or more targets of a fan-out put failed after retries.
    #[error("fan-out put failed for: {}", failed.join(", "))]
    FanOut { failed: Vec<String> },
}

impl StoreError {
    /// Whether the retry loop should try this operation again.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient { .. })
    }
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
