//! In-memory snapshot store.
//!
//! A test double shared by the engine and CLI test suites. Supports two
//! failure-injection knobs: a count of upcoming transient failures (for
//! retry-path tests) and per-container fatal failures (for fan-out tests).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::store::{Locator, SnapshotStore};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Shared-map store with failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    transient_failures: AtomicUsize,
    failed_containers: Mutex<HashSet<String>>,
    puts: AtomicUsize,
    fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through `put` (no failure injection,
    /// no counter bump).
    pub fn insert(&self, locator: &Locator, bytes: &[u8], content_type: &str) {
        self.objects.lock().unwrap().insert(
            key(locator),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_owned(),
            },
        );
    }

    /// Current bytes at `locator`, if any.
    pub fn get(&self, locator: &Locator) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&key(locator))
            .map(|o| o.bytes.clone())
    }

    /// Content type recorded at `locator`, if any.
    pub fn content_type(&self, locator: &Locator) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&key(locator))
            .map(|o| o.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }

    /// Fail the next `n` operations (fetch or put) with a transient error.
    pub fn fail_next(&self, n: usize) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    /// Fail every operation on `container` with a fatal error.
    pub fn fail_container(&self, container: &str) {
        self.failed_containers
            .lock()
            .unwrap()
            .insert(container.to_owned());
    }

    /// Number of `put` calls observed (including failed ones).
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of `fetch` calls observed (including failed ones).
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_failures(&self, locator: &Locator) -> Result<(), StoreError> {
        if self
            .failed_containers
            .lock()
            .unwrap()
            .contains(&locator.container)
        {
            return Err(StoreError::Fatal {
                locator: locator.to_string(),
                message: "container unavailable".to_owned(),
            });
        }
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Transient {
                locator: locator.to_string(),
                message: "injected transient failure".to_owned(),
            });
        }
        Ok(())
    }
}

impl SnapshotStore for MemoryStore {
    fn fetch(&self, locator: &Locator) -> Result<Option<Vec<u8>>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_failures(locator)?;
        Ok(self.get(locator))
    }

    fn put(&self, locator: &Locator, bytes: &[u8], content_type: &str) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.check_failures(locator)?;
        self.insert(locator, bytes, content_type);
        Ok(())
    }
}

fn key(locator: &Locator) -> (String, String) {
    (locator.container.clone(), locator.path.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
