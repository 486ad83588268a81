//! The snapshot store seam.

use std::fmt;

use crate::error::StoreError;

/// Content type used for every persisted report document.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Address of one named document: a container (bucket, directory) plus a
/// path within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub container: String,
    pub path: String,
}

impl Locator {
    pub fn new(container: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.path)
    }
}

/// Byte-level fetch/put of named documents.
///
/// Implementations report a missing object as `Ok(None)` from [`fetch`] and
/// mark retryable failures with [`StoreError::Transient`]; everything else
/// surfaces as-is. Retry is layered on top by [`crate::retry`], not inside
/// implementations.
///
/// [`fetch`]: SnapshotStore::fetch
pub trait SnapshotStore {
    /// Fetch the document bytes at `locator`, or `None` if no such object.
    fn fetch(&self, locator: &Locator) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `bytes` to `locator` with the given content type.
    fn put(&self, locator: &Locator, bytes: &[u8], content_type: &str) -> Result<(), StoreError>;
}
