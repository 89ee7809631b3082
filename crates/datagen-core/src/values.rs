//! Generated values and records.
//!
//! Every record produced during a run lives here: node identifiers,
//! synthesized property values, and the node/relationship records handed
//! from the generators to the emitter.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Format used when serializing dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used when serializing datetimes (ISO 8601, no offset).
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Property values keyed by simple property name.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Identifier of a generated node, unique within its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    /// Raw sequential counter
    Integer(i64),
    /// Zero-padded label-prefixed counter
    String(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Integer(i) => write!(f, "{i}"),
            NodeId::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NodeId::Integer(i) => serializer.serialize_i64(*i),
            NodeId::String(s) => serializer.serialize_str(s),
        }
    }
}

/// A single synthesized property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Absent value (unsupported type)
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Local date and time
    DateTime(NaiveDateTime),
}

impl PropertyValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a point in time. Dates map to midnight.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Convert to a JSON value for parameter payloads.
    ///
    /// Dates and datetimes become ISO 8601 strings. Non-finite floats have no
    /// JSON representation and become null with a warning.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => serde_json::Value::Number(n),
                None => {
                    tracing::warn!("Cannot serialize float value {f} as JSON. Writing null.");
                    serde_json::Value::Null
                }
            },
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
            Self::DateTime(dt) => {
                serde_json::Value::String(dt.format(DATETIME_FORMAT).to_string())
            }
        }
    }
}

impl From<NodeId> for PropertyValue {
    fn from(id: NodeId) -> Self {
        match id {
            NodeId::Integer(i) => PropertyValue::Integer(i),
            NodeId::String(s) => PropertyValue::String(s),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

/// A generated node: its label, identifier, and full property record.
///
/// `properties` includes the identifier under the label's id property name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNode {
    /// Node label
    pub label: String,
    /// Identifier, unique within the label
    pub id: NodeId,
    /// All properties, identifier included
    pub properties: PropertyMap,
}

impl GeneratedNode {
    /// Create a new node record.
    pub fn new(label: impl Into<String>, id: NodeId, properties: PropertyMap) -> Self {
        Self {
            label: label.into(),
            id,
            properties,
        }
    }

    /// Get a property value by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A generated relationship between two generated nodes.
///
/// Relationships have no identifier of their own; parallel edges between the
/// same pair are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRelationship {
    /// Label of the source node
    pub source_label: String,
    /// Identifier of the source node
    pub source_id: NodeId,
    /// Label of the target node
    pub target_label: String,
    /// Identifier of the target node
    pub target_id: NodeId,
    /// Relationship type
    pub rel_type: String,
    /// Relationship properties
    pub properties: PropertyMap,
}

impl GeneratedRelationship {
    /// Get a property value by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}
