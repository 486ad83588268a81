//! Sync orchestrator — fetch-or-rebuild, apply batch, persist.
//!
//! This is the canonical incremental entrypoint: one run owns one in-memory
//! report and one bounded batch of ordered change records for a single
//! snapshot document. Concurrent runs against the same locator are a
//! caller-level invariant; nothing here locks the document.

use serde_json::Value;

use histrep_core::ResourceAdapter;
use histrep_store::{
    fetch_with_retry, put_with_retry, Locator, RetryPolicy, SnapshotStore, CONTENT_TYPE_JSON,
};

use crate::error::EngineError;
use crate::{document, generate, update};

/// Policy flags for one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Write the result back. When false the run is a preview: no bytes
    /// leave the process.
    pub commit: bool,
    /// When the snapshot is legitimately absent (first run), fall back to a
    /// full rebuild instead of skipping.
    pub export_if_missing: bool,
}

/// Outcome of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Snapshot fetched, batch applied, document written back.
    Updated {
        applied: usize,
        dropped: usize,
        item_count: usize,
    },
    /// Dry run: batch applied in memory, nothing persisted.
    WouldUpdate {
        applied: usize,
        dropped: usize,
        item_count: usize,
    },
    /// Snapshot was absent; a full rebuild was exported as the new baseline.
    Rebuilt { item_count: usize },
    /// Snapshot was absent and policy did not allow a rebuild; no action.
    SkippedMissing,
}

/// Run the synchronizer for one snapshot document.
///
/// 1. Fetch the existing snapshot (with retry).
/// 2. Absent + `commit && export_if_missing`: full rebuild becomes the new
///    baseline. Absent otherwise: report [`SyncOutcome::SkippedMissing`].
/// 3. Present: decode, apply every record in order.
/// 4. Re-encode with a fresh `generated_date`.
/// 5. Persist when `commit`, otherwise discard.
pub fn sync(
    store: &dyn SnapshotStore,
    adapter: &dyn ResourceAdapter,
    locator: &Locator,
    records: &[Value],
    options: SyncOptions,
    policy: &RetryPolicy,
) -> Result<SyncOutcome, EngineError> {
    let config = adapter.config();
    tracing::debug!("starting record update for '{}'", config.resource_type);

    let Some(bytes) = fetch_with_retry(store, locator, policy)? else {
        if options.commit && options.export_if_missing {
            tracing::info!("report does not exist at {locator}; dumping the full report");
            let report = generate::build_report(adapter)?;
            let encoded = document::encode(&report, config)?;
            put_with_retry(store, locator, &encoded, CONTENT_TYPE_JSON, policy)?;
            return Ok(SyncOutcome::Rebuilt {
                item_count: report.items.len(),
            });
        }
        tracing::error!(
            "report does not exist at {locator} and export-if-missing is not in effect; \
             nothing to do"
        );
        return Ok(SyncOutcome::SkippedMissing);
    };
    tracing::debug!("grabbed the existing snapshot from storage");

    let mut report = document::decode(&bytes, config)?;
    let stats = update::apply_records(&mut report, records, config);
    let item_count = report.items.len();
    let encoded = document::encode(&report, config)?;

    if options.commit {
        tracing::debug!("saving updated report to {locator}");
        put_with_retry(store, locator, &encoded, CONTENT_TYPE_JSON, policy)?;
        tracing::debug!("completed record update for '{}'", config.resource_type);
        Ok(SyncOutcome::Updated {
            applied: stats.applied,
            dropped: stats.dropped,
            item_count,
        })
    } else {
        tracing::debug!("commit flag not set, not saving");
        Ok(SyncOutcome::WouldUpdate {
            applied: stats.applied,
            dropped: stats.dropped,
            item_count,
        })
    }
}
