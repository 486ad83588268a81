//! Histrep core library — domain types, resource configuration, redaction,
//! change-event parsing, errors.
//!
//! Public API surface:
//! - [`types`] — [`Identity`], [`Attributes`], [`Report`]
//! - [`event`] — [`ChangeEvent`], [`ChangeOp`], [`StreamRecord`]
//! - [`resource`] — [`ResourceConfig`] and the [`ResourceAdapter`] trait
//! - [`redact`] — field redaction shared by rebuild and update paths
//! - [`error`] — [`EventError`], [`IdentityError`], [`ScanError`]

pub mod error;
pub mod event;
pub mod redact;
pub mod resource;
pub mod types;

pub use error::{EventError, IdentityError, ScanError};
pub use event::{ChangeEvent, ChangeOp, EventActor, StreamRecord};
pub use resource::{ResourceAdapter, ResourceConfig, ScanIter};
pub use types::{Attributes, Identity, Report};
