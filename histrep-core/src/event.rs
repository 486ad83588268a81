//! Change-stream records and their interpreted form.
//!
//! A [`StreamRecord`] is one raw record from the ordered batch input; a
//! [`ChangeEvent`] is the interpreted event the change processor consumes.
//! Interpretation can fail per record (unknown operation tag, unparseable
//! shape) — those records are dropped with a logged error by the caller and
//! never abort the batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EventError;
use crate::types::{Attributes, Identity};

/// Actor type attached to deletions issued by the durable store's automatic
/// expiry mechanism.
const EXPIRY_ACTOR_TYPE: &str = "Service";

/// Principal id of the expiry mechanism.
const EXPIRY_PRINCIPAL_ID: &str = "dynamodb.amazonaws.com";

// ---------------------------------------------------------------------------
// Raw record
// ---------------------------------------------------------------------------

/// The actor that originated a change, as recorded on the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventActor {
    #[serde(rename = "type")]
    pub actor_type: String,
    #[serde(rename = "principalId")]
    pub principal_id: String,
}

impl EventActor {
    /// True when the actor is the store's automatic expiry mechanism.
    pub fn is_expiry(&self) -> bool {
        self.actor_type == EXPIRY_ACTOR_TYPE && self.principal_id == EXPIRY_PRINCIPAL_ID
    }
}

/// One raw record from the change stream batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Operation tag: `INSERT`, `MODIFY` or `REMOVE`. Anything else is a
    /// malformed record.
    #[serde(rename = "eventName")]
    pub event_name: String,

    /// The resource identity the record refers to.
    pub identity: String,

    /// New attribute bag for INSERT / MODIFY. Absent when the source could
    /// not fully materialize the item (payload too large for its transport)
    /// or for an explicit soft-delete; both collapse to a deletion.
    #[serde(rename = "newImage", default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<Attributes>,

    /// Originating actor, when the stream recorded one.
    #[serde(rename = "userIdentity", default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<EventActor>,
}

impl StreamRecord {
    /// Parse one record from raw JSON. Failures are per-record.
    pub fn from_value(value: &Value) -> Result<Self, EventError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

// ---------------------------------------------------------------------------
// Interpreted event
// ---------------------------------------------------------------------------

/// The operation a change event performs on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Insert,
    Modify,
    Remove,
}

/// One interpreted change event, ready for the change processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub op: ChangeOp,
    pub identity: Identity,
    pub new_attributes: Option<Attributes>,
    /// True when a REMOVE is attributed to the automatic expiry mechanism.
    /// The durable store is never expected to expire entries, so such events
    /// are logged as anomalies and must not mutate the report.
    pub anomalous_expiry: bool,
}

impl ChangeEvent {
    /// Interpret a parsed stream record.
    pub fn from_record(record: StreamRecord) -> Result<Self, EventError> {
        let op = match record.event_name.as_str() {
            "INSERT" => ChangeOp::Insert,
            "MODIFY" => ChangeOp::Modify,
            "REMOVE" => ChangeOp::Remove,
            other => return Err(EventError::UnknownOperation(other.to_owned())),
        };
        let anomalous_expiry = op == ChangeOp::Remove
            && record.actor.as_ref().is_some_and(EventActor::is_expiry);
        Ok(Self {
            op,
            identity: Identity::from(record.identity),
            new_attributes: record.new_image,
            anomalous_expiry,
        })
    }

    /// Parse and interpret in one step.
    pub fn from_value(value: &Value) -> Result<Self, EventError> {
        Self::from_record(StreamRecord::from_value(value)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
