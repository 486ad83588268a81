//! # histrep-store
//!
//! Byte-oriented snapshot storage behind the [`SnapshotStore`] trait, with an
//! explicit retry policy wrapped around its two operations.
//!
//! Backends: [`FsStore`] (directory-per-container on the local filesystem)
//! and [`MemoryStore`] (shared-map test double with failure injection).

pub mod error;
pub mod fs;
pub mod memory;
pub mod retry;
pub mod store;

pub use error::StoreError;
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use retry::{fetch_with_retry, put_all, put_with_retry, RetryPolicy};
pub use store::{Locator, SnapshotStore, CONTENT_TYPE_JSON};
