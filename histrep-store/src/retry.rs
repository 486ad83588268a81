//! Retry policy wrapped around the store's two operations.
//!
//! Transient failures are retried up to `max_attempts` with exponential
//! backoff; exhausted retries escalate to [`StoreError::RetriesExhausted`].
//! Non-transient failures are never retried.

use std::time::Duration;

use crate::error::StoreError;
use crate::store::{Locator, SnapshotStore};

/// Explicit retry policy: attempt cap plus backoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 3 attempts, exponential backoff base 1s, cap 10s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay variant for tests; keeps the attempt cap.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Backoff before the retry following failure number `attempt` (1-based):
    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1u32 << shift);
        delay.min(self.max_delay)
    }
}

fn with_retry<T>(
    policy: &RetryPolicy,
    mut op: impl FnMut() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "transient storage failure (attempt {attempt}/{}), retrying in {delay:?}: {err}",
                    policy.max_attempts
                );
                std::thread::sleep(delay);
            }
            Err(err) if err.is_transient() => {
                return Err(StoreError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
            Err(err) => return Err(err),
        }
    }
}

/// Fetch with retry. A missing object is `Ok(None)`, never retried.
pub fn fetch_with_retry(
    store: &dyn SnapshotStore,
    locator: &Locator,
    policy: &RetryPolicy,
) -> Result<Option<Vec<u8>>, StoreError> {
    with_retry(policy, || store.fetch(locator))
}

/// Put with retry.
pub fn put_with_retry(
    store: &dyn SnapshotStore,
    locator: &Locator,
    bytes: &[u8],
    content_type: &str,
    policy: &RetryPolicy,
) -> Result<(), StoreError> {
    with_retry(policy, || store.put(locator, bytes, content_type))
}

/// Fan-out put: write the same payload to every locator.
///
/// Each target is attempted (and retried) independently; a failure on one
/// target does not prevent attempts on the others, but the overall operation
/// fails if any target failed after retries.
pub fn put_all(
    store: &dyn SnapshotStore,
    locators: &[Locator],
    bytes: &[u8],
    content_type: &str,
    policy: &RetryPolicy,
) -> Result<(), StoreError> {
    let mut failed = Vec::new();
    for locator in locators {
        tracing::debug!("dumping to {locator}");
        match put_with_retry(store, locator, bytes, content_type, policy) {
            Ok(()) => tracing::debug!("completed dump to {locator}"),
            Err(err) => {
                tracing::error!("dump to {locator} failed: {err}");
                failed.push(locator.to_string());
            }
        }
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(StoreError::FanOut { failed })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::store::CONTENT_TYPE_JSON;

    fn locator(path: &str) -> Locator {
        Locator::new("reports", path)
    }

    #[test]
    fn delay_curve_doubles_up_to_the_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for(30), Duration::from_secs(10));
    }

    #[test]
    fn transient_failures_below_the_cap_succeed() {
        let store = MemoryStore::new();
        store.insert(&locator("a.json"), b"payload", CONTENT_TYPE_JSON);
        store.fail_next(2);

        let bytes = fetch_with_retry(&store, &locator("a.json"), &RetryPolicy::immediate(3))
            .unwrap()
            .unwrap();
        assert_eq!(bytes, b"payload");
    }

    #[test]
    fn exhausted_retries_escalate() {
        let store = MemoryStore::new();
        store.fail_next(10);

        let err = fetch_with_retry(&store, &locator("a.json"), &RetryPolicy::immediate(3))
            .unwrap_err();
        match err {
            StoreError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(source.is_transient());
            }
            other => panic!("expected RetriesExhausted, got {other}"),
        }
    }

    #[test]
    fn fatal_failures_are_not_retried() {
        let store = MemoryStore::new();
        store.fail_container("reports");

        let err = put_with_retry(
            &store,
            &locator("a.json"),
            b"x",
            CONTENT_TYPE_JSON,
            &RetryPolicy::immediate(3),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Fatal { .. }));
        // A single attempt: the fatal error came straight through.
        assert_eq!(store.puts(), 1);
    }

    #[test]
    fn missing_object_is_none_not_an_error() {
        let store = MemoryStore::new();
        let found = fetch_with_retry(&store, &locator("nope.json"), &RetryPolicy::immediate(3))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn fan_out_continues_past_a_failed_target() {
        let store = MemoryStore::new();
        store.fail_container("broken");

        let targets = vec![
            Locator::new("dump0", "report.json"),
            Locator::new("broken", "report.json"),
            Locator::new("dump1", "report.json"),
        ];
        let err = put_all(
            &store,
            &targets,
            b"payload",
            CONTENT_TYPE_JSON,
            &RetryPolicy::immediate(3),
        )
        .unwrap_err();

        match err {
            StoreError::FanOut { failed } => {
                assert_eq!(failed, vec!["broken/report.json".to_string()]);
            }
            other => panic!("expected FanOut, got {other}"),
        }
        // The healthy targets were still written.
        assert!(store.get(&Locator::new("dump0", "report.json")).is_some());
        assert!(store.get(&Locator::new("dump1", "report.json")).is_some());
    }

    #[test]
    fn fan_out_all_targets_healthy() {
        let store = MemoryStore::new();
        let targets = vec![
            Locator::new("dump0", "report.json"),
            Locator::new("dump1", "report.json"),
        ];
        put_all(
            &store,
            &targets,
            b"payload",
            CONTENT_TYPE_JSON,
            &RetryPolicy::immediate(3),
        )
        .unwrap();
        assert_eq!(store.len(), 2);
    }
}
