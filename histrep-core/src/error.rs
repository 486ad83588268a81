//! Error types for histrep-core.

use thiserror::Error;

/// Errors raised while interpreting a single change-stream record.
///
/// These are per-event problems: the orchestration layer drops and logs the
/// offending record rather than aborting the batch.
#[derive(Debug, Error)]
pub enum EventError {
    /// The record carried an operation tag outside INSERT / MODIFY / REMOVE.
    #[error("unknown operation '{0}' on change record")]
    UnknownOperation(String),

    /// The record could not be parsed into a [`crate::StreamRecord`] at all
    /// (missing required fields, wrong shapes).
    #[error("malformed change record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised while extracting an [`crate::Identity`] from a raw item.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity field was absent from the attribute bag.
    #[error("item is missing identity field '{field}'")]
    MissingField { field: String },

    /// The identity field was present but not a string.
    #[error("identity field '{field}' is not a string")]
    NotAString { field: String },
}

/// A failure while producing or consuming a resource adapter's full scan.
///
/// A partial scan must never become a partial report, so the caller treats
/// any scan failure as fatal for the whole rebuild.
#[derive(Debug, Error)]
#[error("resource scan failed: {message}")]
pub struct ScanError {
    message: String,
}

impl ScanError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
