//! Field redaction shared by the full-rebuild and per-event paths.
//!
//! Both paths must strip the same fields identically — this equivalence is
//! the core correctness property of the synchronizer, so the stripping logic
//! exists exactly once, here.

use std::collections::BTreeSet;

use crate::error::IdentityError;
use crate::resource::ResourceConfig;
use crate::types::{Attributes, Identity};

/// Internal marker fields stripped from every serialized item regardless of
/// configuration (`_version` is the durable store's schema version marker).
pub const ALWAYS_EXCLUDED: &[&str] = &["_version"];

/// Copy `attributes` with every key in `excluded` removed.
///
/// Missing keys are ignored. The input is never mutated.
pub fn redact(attributes: &Attributes, excluded: &BTreeSet<String>) -> Attributes {
    let mut out = attributes.clone();
    for field in excluded {
        out.remove(field);
    }
    out
}

/// Resolve a raw item into the attribute bag stored in a report: strip the
/// identity field, the always-excluded markers, and the configured
/// exclusions.
pub fn resolve_item(attributes: &Attributes, config: &ResourceConfig) -> Attributes {
    let mut out = redact(attributes, &config.excluded_fields);
    out.remove(&config.identity_field);
    for field in ALWAYS_EXCLUDED {
        out.remove(*field);
    }
    out
}

/// Extract the identity key from a raw item's attribute bag.
pub fn extract_identity(
    attributes: &Attributes,
    config: &ResourceConfig,
) -> Result<Identity, IdentityError> {
    let value = attributes
        .get(&config.identity_field)
        .ok_or_else(|| IdentityError::MissingField {
            field: config.identity_field.clone(),
        })?;
    let name = value.as_str().ok_or_else(|| IdentityError::NotAString {
        field: config.identity_field.clone(),
    })?;
    Ok(Identity::from(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
