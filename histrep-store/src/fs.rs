//! Filesystem snapshot store.
//!
//! Containers map to directories under a root, paths to files within them.
//! Writes go to `<path>.tmp` then rename, so a crashed run never leaves a
//! half-written document behind. Content type has no filesystem
//! representation and is ignored.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{io_err, StoreError};
use crate::store::{Locator, SnapshotStore};

/// Directory-backed store rooted at a single path.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// On-disk location for a locator: `<root>/<container>/<path>`.
    pub fn object_path(&self, locator: &Locator) -> PathBuf {
        self.root.join(&locator.container).join(&locator.path)
    }
}

impl SnapshotStore for FsStore {
    fn fetch(&self, locator: &Locator) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.object_path(locator);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(path, err)),
        }
    }

    fn put(
        &self,
        locator: &Locator,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let path = self.object_path(locator);
        let Some(dir) = path.parent() else {
            return Err(io_err(
                path,
                std::io::Error::other("invalid object path"),
            ));
        };
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let tmp = PathBuf::from(format!("{}.tmp", path.display()));
        std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
        if let Err(err) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(path, err));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
