//! Resource-type configuration and the adapter seam.
//!
//! Each supported resource type is described by a small [`ResourceConfig`]
//! record instead of a dynamically synthesized schema: the identity field,
//! the configurable exclusion list, the plural items field name of the wire
//! document, and the fixed report version. Scan access and per-item
//! serialization rules live behind the [`ResourceAdapter`] trait so the
//! engine never talks to a provider SDK directly.

use std::collections::BTreeSet;

use crate::error::ScanError;
use crate::types::Attributes;

/// Report schema generation numbers, fixed per resource type.
pub const S3_REPORT_VERSION: u32 = 1;
pub const SECURITY_GROUP_REPORT_VERSION: u32 = 1;

/// Default configurable exclusions (`--exclude-fields` default).
pub const DEFAULT_EXCLUDED_FIELDS: &[&str] = &["Name"];

// ---------------------------------------------------------------------------
// ResourceConfig
// ---------------------------------------------------------------------------

/// Per-resource-type field schema, threaded explicitly through every
/// orchestration call — there is no process-wide mutable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Short tag used in log lines (`s3`, `securitygroup`).
    pub resource_type: String,
    /// Attribute key holding the unique identity; stripped from serialized
    /// items to avoid redundancy with the map key.
    pub identity_field: String,
    /// Configurable exclusions, on top of the always-excluded internal
    /// markers (see [`crate::redact::ALWAYS_EXCLUDED`]).
    pub excluded_fields: BTreeSet<String>,
    /// Name of the items mapping in the wire document (`buckets`,
    /// `securitygroups`).
    pub items_field_name: String,
    /// Fixed schema generation for this resource type.
    pub report_version: u32,
}

impl ResourceConfig {
    fn builtin(
        resource_type: &str,
        identity_field: &str,
        items_field_name: &str,
        report_version: u32,
    ) -> Self {
        Self {
            resource_type: resource_type.to_owned(),
            identity_field: identity_field.to_owned(),
            excluded_fields: DEFAULT_EXCLUDED_FIELDS
                .iter()
                .map(|f| (*f).to_owned())
                .collect(),
            items_field_name: items_field_name.to_owned(),
            report_version,
        }
    }

    /// Configuration for S3 bucket reports.
    pub fn s3() -> Self {
        Self::builtin("s3", "Name", "buckets", S3_REPORT_VERSION)
    }

    /// Configuration for security-group reports.
    pub fn security_group() -> Self {
        Self::builtin(
            "securitygroup",
            "GroupId",
            "securitygroups",
            SECURITY_GROUP_REPORT_VERSION,
        )
    }

    /// Replace the configurable exclusion list (e.g. from a CLI override).
    pub fn with_excluded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// ResourceAdapter
// ---------------------------------------------------------------------------

/// A lazy, finite, non-restartable full scan of the source of truth.
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<Attributes, ScanError>> + 'a>;

/// Seam between the engine and the source-of-truth glue (SDK calls, test
/// fixtures, scan files). One implementation per resource-type backend.
pub trait ResourceAdapter {
    /// The field schema this adapter serves.
    fn config(&self) -> &ResourceConfig;

    /// Start a full scan. Item-level failures surface through the iterator
    /// and abort the rebuild that consumes them.
    fn scan(&self) -> Result<ScanIter<'_>, ScanError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
