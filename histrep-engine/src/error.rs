//! Error types for histrep-engine.
//!
//! Per-event problems ([`histrep_core::EventError`]) never appear here —
//! they are recovered locally (skip + log) inside the batch loop. Everything
//! in this enum is per-run and fatal.

use thiserror::Error;

use histrep_core::{IdentityError, ScanError};
use histrep_store::StoreError;

/// All errors that abort an orchestration run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Retry-exhausted or otherwise fatal storage failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The resource adapter's full scan failed; a rebuild is all-or-nothing.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A scanned item had no usable identity.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The fetched snapshot document does not match the wire contract.
    #[error("malformed snapshot document: {0}")]
    Document(String),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
