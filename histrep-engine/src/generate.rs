//! Report builder — full rebuild of a snapshot from a complete source scan.

use histrep_core::{redact, Report, ResourceAdapter};
use histrep_store::{put_all, Locator, RetryPolicy, SnapshotStore, CONTENT_TYPE_JSON};

use crate::document;
use crate::error::EngineError;

/// Outcome of a full export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The report was built and written to every target.
    Exported { item_count: usize, targets: usize },
    /// Commit flag not set: the report was built and discarded.
    WouldExport { item_count: usize },
}

/// Build a report from the adapter's full scan.
///
/// Any scan failure aborts the build — a partial scan must not silently
/// produce a partial report.
pub fn build_report(adapter: &dyn ResourceAdapter) -> Result<Report, EngineError> {
    let config = adapter.config();
    tracing::debug!("beginning full scan for '{}'", config.resource_type);

    let mut report = Report::new(config.report_version);
    for item in adapter.scan()? {
        let attributes = item?;
        let identity = redact::extract_identity(&attributes, config)?;
        tracing::debug!("fetched details for {identity}");
        let resolved = redact::resolve_item(&attributes, config);
        // The report never holds empty attribute bags.
        if resolved.is_empty() {
            continue;
        }
        report.items.insert(identity, resolved);
    }
    Ok(report)
}

/// Full rebuild and fan-out dump: scan, encode, and (when `commit`) write
/// the document to every target locator.
pub fn export(
    store: &dyn SnapshotStore,
    adapter: &dyn ResourceAdapter,
    targets: &[Locator],
    policy: &RetryPolicy,
    commit: bool,
) -> Result<ExportOutcome, EngineError> {
    let config = adapter.config();
    let report = build_report(adapter)?;
    let bytes = document::encode(&report, config)?;
    let item_count = report.items.len();

    if !commit {
        tracing::debug!("commit flag not set, not saving");
        return Ok(ExportOutcome::WouldExport { item_count });
    }

    tracing::debug!("saving '{}' report to {} target(s)", config.resource_type, targets.len());
    put_all(store, targets, &bytes, CONTENT_TYPE_JSON, policy)?;
    tracing::debug!("completed '{}' report generation", config.resource_type);

    Ok(ExportOutcome::Exported {
        item_count,
        targets: targets.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
