//! Domain types for snapshot reports.
//!
//! A [`Report`] is the in-memory form of one persisted snapshot document:
//! a keyed map of field-filtered attribute bags plus the schema generation
//! number. The `generated_date` of the wire format is deliberately *not*
//! part of this type — it is produced fresh at serialization time and never
//! read back from storage.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed unique key for one resource instance (e.g. a bucket
/// name or a security-group id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Attribute bags
// ---------------------------------------------------------------------------

/// Opaque key/value description of one resource instance.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One snapshot report, materialized in memory for the duration of an
/// orchestration run.
///
/// `items` never contains an entry with an empty attribute bag: an upsert
/// that resolves to empty attributes collapses to a deletion instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Schema generation number; fixed per resource type.
    pub report_version: u32,
    /// Keyed lookup is the only access pattern; `BTreeMap` keeps encoded
    /// documents deterministic.
    pub items: BTreeMap<Identity, Attributes>,
}

impl Report {
    /// An empty report at the given schema generation.
    pub fn new(report_version: u32) -> Self {
        Self {
            report_version,
            items: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
