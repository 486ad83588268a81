//! Wire codec for snapshot documents.
//!
//! The persisted shape is:
//!
//! ```json
//! {
//!     "report_version": 1,
//!     "generated_date": "2018-03-14T15:09:26Z",
//!     "<items-field-name>": { "<identity>": { ... }, ... }
//! }
//! ```
//!
//! `generated_date` is produced fresh on every encode and ignored on decode;
//! the rebuild and update paths must emit byte-for-byte compatible schemas.

use chrono::Utc;
use serde_json::{json, Map, Value};

use histrep_core::{Identity, Report, ResourceConfig};

use crate::error::EngineError;

/// Stand-in the durable store uses for intentionally blank strings; the
/// downstream attribute store cannot represent empty strings natively, so it
/// is rewritten to `""` before persisting.
pub const EMPTY_PLACEHOLDER: &str = "<empty>";

/// ISO-8601 UTC at second precision with a trailing `Z`.
pub fn generated_date() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Serialize a report for persistence.
pub fn encode(report: &Report, config: &ResourceConfig) -> Result<Vec<u8>, EngineError> {
    let mut items = Map::new();
    for (identity, attributes) in &report.items {
        items.insert(identity.to_string(), Value::Object(attributes.clone()));
    }

    let mut doc = Map::new();
    doc.insert("report_version".to_owned(), json!(report.report_version));
    doc.insert("generated_date".to_owned(), json!(generated_date()));
    doc.insert(config.items_field_name.clone(), Value::Object(items));

    let text = serde_json::to_string_pretty(&Value::Object(doc))?;
    let text = text.replace(&format!("\"{EMPTY_PLACEHOLDER}\""), "\"\"");
    Ok(text.into_bytes())
}

/// Deserialize a persisted report.
///
/// The stored `generated_date` is ignored — it is never read back, only
/// refreshed on the next write.
pub fn decode(bytes: &[u8], config: &ResourceConfig) -> Result<Report, EngineError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let report_version = value
        .get("report_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            EngineError::Document("missing or non-integer 'report_version'".to_owned())
        })?;
    let report_version = u32::try_from(report_version).map_err(|_| {
        EngineError::Document(format!("'report_version' out of range: {report_version}"))
    })?;

    let raw_items = value
        .get(&config.items_field_name)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            EngineError::Document(format!(
                "missing items field '{}'",
                config.items_field_name
            ))
        })?;

    let mut report = Report::new(report_version);
    for (name, item) in raw_items {
        let Value::Object(attributes) = item else {
            return Err(EngineError::Document(format!(
                "item '{name}' is not an object"
            )));
        };
        report
            .items
            .insert(Identity::from(name.as_str()), attributes.clone());
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use histrep_core::Attributes;

    use super::*;

    fn as_attributes(value: Value) -> Option<Attributes> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn sample_report() -> Report {
        let mut report = Report::new(1);
        report.items.insert(
            Identity::from("bucket0"),
            as_attributes(json!({"Region": "us-east-1", "Owner": "<empty>"})).unwrap(),
        );
        report.items.insert(
            Identity::from("bucket1"),
            as_attributes(json!({"Region": "eu-west-1"})).unwrap(),
        );
        report
    }

    #[test]
    fn encode_produces_the_wire_shape() {
        let bytes = encode(&sample_report(), &ResourceConfig::s3()).unwrap();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(doc["report_version"], json!(1));
        assert_eq!(doc["buckets"]["bucket1"]["Region"], json!("eu-west-1"));
        assert_eq!(doc["buckets"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn generated_date_is_second_precision_utc() {
        let date = generated_date();
        // e.g. 2018-03-14T15:09:26Z
        assert_eq!(date.len(), 20);
        assert!(date.ends_with('Z'));
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[10..11], "T");
        assert!(!date.contains('.'), "no sub-second precision");
    }

    #[test]
    fn empty_placeholder_is_rewritten_before_persisting() {
        let bytes = encode(&sample_report(), &ResourceConfig::s3()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains(EMPTY_PLACEHOLDER));

        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["buckets"]["bucket0"]["Owner"], json!(""));
    }

    #[test]
    fn roundtrip_reproduces_items_and_version() {
        let report = sample_report();
        let config = ResourceConfig::s3();
        let bytes = encode(&report, &config).unwrap();
        let decoded = decode(&bytes, &config).unwrap();
        assert_eq!(decoded.report_version, report.report_version);
        // The placeholder rewrite touched bucket0; bucket1 survives intact.
        assert_eq!(
            decoded.items.get(&Identity::from("bucket1")),
            report.items.get(&Identity::from("bucket1"))
        );
        assert_eq!(decoded.items.len(), report.items.len());
    }

    #[test]
    fn stored_generated_date_is_never_reused() {
        let config = ResourceConfig::s3();
        let stale = json!({
            "report_version": 1,
            "generated_date": "2000-01-01T00:00:00Z",
            "buckets": {"bucket0": {"Region": "us-east-1"}},
        });
        let report = decode(stale.to_string().as_bytes(), &config).unwrap();
        let reencoded: Value =
            serde_json::from_slice(&encode(&report, &config).unwrap()).unwrap();
        assert_ne!(reencoded["generated_date"], json!("2000-01-01T00:00:00Z"));
    }

    #[test]
    fn decode_missing_version_is_malformed() {
        let config = ResourceConfig::s3();
        let err = decode(br#"{"buckets": {}}"#, &config).unwrap_err();
        assert!(matches!(err, EngineError::Document(_)));
    }

    #[test]
    fn decode_out_of_range_version_is_malformed() {
        let config = ResourceConfig::s3();
        let err = decode(
            br#"{"report_version": 4294967296, "buckets": {}}"#,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Document(_)));
    }

    #[test]
    fn decode_missing_items_field_is_malformed() {
        let config = ResourceConfig::s3();
        let err = decode(br#"{"report_version": 1}"#, &config).unwrap_err();
        assert!(matches!(err, EngineError::Document(_)));
    }

    #[test]
    fn decode_non_object_item_is_malformed() {
        let config = ResourceConfig::s3();
        let err =
            decode(br#"{"report_version": 1, "buckets": {"b": 3}}"#, &config).unwrap_err();
        assert!(matches!(err, EngineError::Document(_)));
    }
}
