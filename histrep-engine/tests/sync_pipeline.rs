//! End-to-end orchestration scenarios against the in-memory store.

use serde_json::{json, Value};

use histrep_core::{Identity, ResourceAdapter, ResourceConfig, ScanError, ScanIter};
use histrep_engine::{document, pipeline, SyncOptions, SyncOutcome};
use histrep_store::{Locator, MemoryStore, RetryPolicy, CONTENT_TYPE_JSON};

/// Adapter over a fixed scan fixture.
struct FixtureAdapter {
    config: ResourceConfig,
    items: Vec<Value>,
}

impl FixtureAdapter {
    fn new(items: Vec<Value>) -> Self {
        Self {
            config: ResourceConfig::s3(),
            items,
        }
    }
}

impl ResourceAdapter for FixtureAdapter {
    fn config(&self) -> &ResourceConfig {
        &self.config
    }

    fn scan(&self) -> Result<ScanIter<'_>, ScanError> {
        let iter = self.items.clone().into_iter().map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(ScanError::new(format!("not an object: {other}"))),
        });
        Ok(Box::new(iter))
    }
}

fn scan_fixture(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "Name": format!("bucket{i}"),
                "_version": 1,
                "AccountId": "123456789012",
                "Region": "us-east-1",
            })
        })
        .collect()
}

fn seed_snapshot(store: &MemoryStore, locator: &Locator, count: usize) {
    let adapter = FixtureAdapter::new(scan_fixture(count));
    let report = histrep_engine::build_report(&adapter).unwrap();
    let bytes = document::encode(&report, adapter.config()).unwrap();
    store.insert(locator, &bytes, CONTENT_TYPE_JSON);
}

fn locator() -> Locator {
    Locator::new("dump0", "historical-report.json")
}

fn policy() -> RetryPolicy {
    RetryPolicy::immediate(3)
}

fn commit_options() -> SyncOptions {
    SyncOptions {
        commit: true,
        export_if_missing: true,
    }
}

fn items_in(store: &MemoryStore, locator: &Locator) -> serde_json::Map<String, Value> {
    let bytes = store.get(locator).expect("document present");
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    doc["buckets"].as_object().unwrap().clone()
}

#[test]
fn insert_event_grows_the_snapshot() {
    let store = MemoryStore::new();
    seed_snapshot(&store, &locator(), 10);
    let adapter = FixtureAdapter::new(scan_fixture(10));

    let records = vec![json!({
        "eventName": "INSERT",
        "identity": "testbucketNEWBUCKET",
        "newImage": {"Name": "testbucketNEWBUCKET", "Region": "us-east-1"},
    })];
    let outcome = pipeline::sync(
        &store,
        &adapter,
        &locator(),
        &records,
        commit_options(),
        &policy(),
    )
    .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Updated {
            applied: 1,
            dropped: 0,
            item_count: 11
        }
    );
    let items = items_in(&store, &locator());
    assert_eq!(items.len(), 11);
    assert!(items.contains_key("testbucketNEWBUCKET"));
}

#[test]
fn remove_event_shrinks_the_snapshot() {
    let store = MemoryStore::new();
    seed_snapshot(&store, &locator(), 10);
    let adapter = FixtureAdapter::new(scan_fixture(10));

    let records = vec![json!({"eventName": "REMOVE", "identity": "bucket0"})];
    pipeline::sync(
        &store,
        &adapter,
        &locator(),
        &records,
        commit_options(),
        &policy(),
    )
    .unwrap();

    let items = items_in(&store, &locator());
    assert_eq!(items.len(), 9);
    assert!(!items.contains_key("bucket0"));
}

#[test]
fn insert_then_remove_scenario() {
    let store = MemoryStore::new();
    let target = locator();
    seed_snapshot(&store, &target, 1); // items = {"bucket0": {...}}
    let adapter = FixtureAdapter::new(scan_fixture(1));

    let records = vec![
        json!({
            "eventName": "INSERT",
            "identity": "b1",
            "newImage": {"Name": "b1", "Region": "eu-west-1"},
        }),
        json!({"eventName": "REMOVE", "identity": "bucket0"}),
    ];
    pipeline::sync(&store, &adapter, &target, &records, commit_options(), &policy()).unwrap();

    let items = items_in(&store, &target);
    assert_eq!(items.len(), 1);
    assert!(items.contains_key("b1"));
}

#[test]
fn missing_snapshot_with_export_rebuilds_from_scan() {
    let store = MemoryStore::new();
    let adapter = FixtureAdapter::new(scan_fixture(10));

    let records = vec![json!({"eventName": "REMOVE", "identity": "bucket0"})];
    let outcome = pipeline::sync(
        &store,
        &adapter,
        &locator(),
        &records,
        commit_options(),
        &policy(),
    )
    .unwrap();

    // Output equals a full rebuild: item count matches the scan cardinality.
    assert_eq!(outcome, SyncOutcome::Rebuilt { item_count: 10 });
    assert_eq!(items_in(&store, &locator()).len(), 10);
}

#[test]
fn missing_snapshot_without_export_skips() {
    let store = MemoryStore::new();
    let adapter = FixtureAdapter::new(scan_fixture(10));

    let outcome = pipeline::sync(
        &store,
        &adapter,
        &locator(),
        &[],
        SyncOptions {
            commit: true,
            export_if_missing: false,
        },
        &policy(),
    )
    .unwrap();

    assert_eq!(outcome, SyncOutcome::SkippedMissing);
    assert_eq!(store.puts(), 0);
    assert!(store.is_empty());
}

#[test]
fn missing_snapshot_without_commit_skips_even_with_export() {
    let store = MemoryStore::new();
    let adapter = FixtureAdapter::new(scan_fixture(10));

    let outcome = pipeline::sync(
        &store,
        &adapter,
        &locator(),
        &[],
        SyncOptions {
            commit: false,
            export_if_missing: true,
        },
        &policy(),
    )
    .unwrap();

    assert_eq!(outcome, SyncOutcome::SkippedMissing);
    assert_eq!(store.puts(), 0);
}

#[test]
fn dry_run_never_invokes_put() {
    let store = MemoryStore::new();
    let target = locator();
    seed_snapshot(&store, &target, 10);
    let before = store.get(&target).unwrap();
    let adapter = FixtureAdapter::new(scan_fixture(10));

    let records = vec![
        json!({
            "eventName": "INSERT",
            "identity": "b1",
            "newImage": {"Name": "b1", "Region": "eu-west-1"},
        }),
        json!({"eventName": "REMOVE", "identity": "bucket0"}),
    ];
    let outcome = pipeline::sync(
        &store,
        &adapter,
        &target,
        &records,
        SyncOptions {
            commit: false,
            export_if_missing: true,
        },
        &policy(),
    )
    .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::WouldUpdate {
            applied: 2,
            dropped: 0,
            item_count: 10
        }
    );
    assert_eq!(store.puts(), 0);
    assert_eq!(store.get(&target).unwrap(), before, "document untouched");
}

#[test]
fn rebuild_and_update_paths_redact_identically() {
    let raw = json!({
        "Name": "bucket0",
        "_version": 7,
        "AccountId": "123456789012",
        "Region": "us-east-1",
        "Tags": {"team": "sre"},
    });

    // Rebuild path.
    let adapter = FixtureAdapter::new(vec![raw.clone()]);
    let rebuilt = histrep_engine::build_report(&adapter).unwrap();

    // Event path.
    let mut updated = histrep_core::Report::new(1);
    histrep_engine::apply_records(
        &mut updated,
        &[json!({"eventName": "INSERT", "identity": "bucket0", "newImage": raw})],
        adapter.config(),
    );

    assert_eq!(
        rebuilt.items.get(&Identity::from("bucket0")),
        updated.items.get(&Identity::from("bucket0"))
    );
}

#[test]
fn transient_storage_failures_are_absorbed_by_retry() {
    let store = MemoryStore::new();
    let target = locator();
    seed_snapshot(&store, &target, 3);
    let adapter = FixtureAdapter::new(scan_fixture(3));
    store.fail_next(2);

    let records = vec![json!({"eventName": "REMOVE", "identity": "bucket1"})];
    let outcome = pipeline::sync(&store, &adapter, &target, &records, commit_options(), &policy())
        .unwrap();
    assert!(matches!(outcome, SyncOutcome::Updated { item_count: 2, .. }));
}

#[test]
fn exhausted_retries_abort_the_run_without_partial_writes() {
    let store = MemoryStore::new();
    let target = locator();
    seed_snapshot(&store, &target, 3);
    let before = store.get(&target).unwrap();
    let adapter = FixtureAdapter::new(scan_fixture(3));
    store.fail_next(10);

    let records = vec![json!({"eventName": "REMOVE", "identity": "bucket1"})];
    let err = pipeline::sync(&store, &adapter, &target, &records, commit_options(), &policy())
        .unwrap_err();
    assert!(matches!(err, histrep_engine::EngineError::Store(_)));
    // The fetch never succeeded, so the document was never rewritten.
    store.fail_next(0);
    assert_eq!(store.get(&target).unwrap(), before);
}

#[test]
fn updated_document_keeps_the_wire_schema() {
    let store = MemoryStore::new();
    let target = locator();
    seed_snapshot(&store, &target, 2);
    let adapter = FixtureAdapter::new(scan_fixture(2));

    let records = vec![json!({
        "eventName": "MODIFY",
        "identity": "bucket0",
        "newImage": {"Name": "bucket0", "Region": "us-west-2"},
    })];
    pipeline::sync(&store, &adapter, &target, &records, commit_options(), &policy()).unwrap();

    let bytes = store.get(&target).unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["report_version"], json!(1));
    assert!(doc["generated_date"].as_str().unwrap().ends_with('Z'));
    assert_eq!(doc["buckets"]["bucket0"]["Region"], json!("us-west-2"));
    assert_eq!(
        store.content_type(&target).as_deref(),
        Some(CONTENT_TYPE_JSON)
    );
}
