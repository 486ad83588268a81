//! Change processor — applies one change event to an in-memory report.
//!
//! Event semantics, by operation:
//! - REMOVE (trusted): delete the entry if present; no-op if absent.
//! - REMOVE attributed to the expiry mechanism: logged no-op. The durable
//!   store is never expected to expire entries, so mutating the report on
//!   such an event risks data loss from a misconfiguration or stream oddity.
//! - INSERT / MODIFY: redact the new attributes; an empty result collapses
//!   to a deletion, otherwise upsert (last writer wins per key).
//!
//! Per-event problems (unknown operation, unparseable record) are dropped
//! with a logged error and never abort the batch.

use serde_json::Value;

use histrep_core::{redact, ChangeEvent, ChangeOp, Report, ResourceConfig, StreamRecord};

/// Outcome counters for one batch application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Events applied to the report (including no-op deletes and anomalies).
    pub applied: usize,
    /// Malformed records dropped without aborting the batch.
    pub dropped: usize,
}

/// Apply one interpreted event to the report, in place.
pub fn apply_event(report: &mut Report, event: &ChangeEvent, config: &ResourceConfig) {
    match event.op {
        ChangeOp::Remove if event.anomalous_expiry => {
            // The durable store has no expiry configured; an expiry-attributed
            // deletion signals a misconfiguration. Log it, touch nothing.
            tracing::error!(
                "expiry-attributed deletion for '{}' in the durable store; this is odd, \
                 leaving the report untouched",
                event.identity
            );
        }
        ChangeOp::Remove => {
            tracing::debug!("removing '{}' from the report", event.identity);
            report.items.remove(&event.identity);
        }
        ChangeOp::Insert | ChangeOp::Modify => {
            let resolved = event
                .new_attributes
                .as_ref()
                .map(|attributes| redact::resolve_item(attributes, config))
                .unwrap_or_default();
            if resolved.is_empty() {
                // The source could not fully materialize the item, or this is
                // an explicit soft-delete. Either way the entry goes away.
                tracing::debug!(
                    "upsert for '{}' resolved to empty attributes; treating as deletion",
                    event.identity
                );
                report.items.remove(&event.identity);
            } else {
                report.items.insert(event.identity.clone(), resolved);
            }
        }
    }
}

/// Interpret and apply a batch of raw records, in input order.
pub fn apply_records(
    report: &mut Report,
    records: &[Value],
    config: &ResourceConfig,
) -> BatchStats {
    let mut stats = BatchStats::default();
    for value in records {
        match StreamRecord::from_value(value).and_then(ChangeEvent::from_record) {
            Ok(event) => {
                apply_event(report, &event, config);
                stats.applied += 1;
            }
            Err(err) => {
                tracing::error!("dropping change record: {err}");
                stats.dropped += 1;
            }
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
