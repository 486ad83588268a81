//! # histrep-engine
//!
//! The snapshot synchronizer: full rebuild, per-event update, and the
//! fetch-or-rebuild → apply batch → persist orchestration.
//!
//! Call [`pipeline::sync`] to apply one bounded batch of change events to a
//! snapshot document, or [`generate::export`] for a full rebuild-and-dump.

pub mod document;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod update;

pub use error::EngineError;
pub use generate::{build_report, export, ExportOutcome};
pub use pipeline::{sync, SyncOptions, SyncOutcome};
pub use update::{apply_event, apply_records, BatchStats};
