//! File-backed resource adapter.
//!
//! Stands in for provider-SDK scan glue: the full scan is a JSON array of
//! raw item objects on disk. The engine only ever sees the
//! [`ResourceAdapter`] trait.

use std::path::PathBuf;

use serde_json::Value;

use histrep_core::{ResourceAdapter, ResourceConfig, ScanError, ScanIter};

/// Adapter whose full scan reads a JSON-array file.
#[derive(Debug)]
pub struct JsonFileAdapter {
    config: ResourceConfig,
    scan_path: Option<PathBuf>,
}

impl JsonFileAdapter {
    pub fn new(config: ResourceConfig, scan_path: Option<PathBuf>) -> Self {
        Self { config, scan_path }
    }
}

impl ResourceAdapter for JsonFileAdapter {
    fn config(&self) -> &ResourceConfig {
        &self.config
    }

    fn scan(&self) -> Result<ScanIter<'_>, ScanError> {
        let Some(path) = &self.scan_path else {
            return Err(ScanError::new("no scan source configured (pass --scan)"));
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScanError::new(format!("cannot read scan file {}: {e}", path.display())))?;
        let values: Vec<Value> = serde_json::from_str(&text)
            .map_err(|e| ScanError::new(format!("scan file {} is not a JSON array: {e}", path.display())))?;

        let iter = values.into_iter().map(|value| match value {
            Value::Object(map) => Ok(map),
            other => Err(ScanError::new(format!("scan item is not an object: {other}"))),
        });
        Ok(Box::new(iter))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
