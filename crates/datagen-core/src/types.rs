//! Declared property types for graph schema analysis documents.
//!
//! Schema documents declare property types as plain strings (`"String"`,
//! `"Integer"`, `"DateTime"`, ...). They are parsed into the closed
//! [`PropertyType`] enum so the synthesizer can match exhaustively. Names the
//! generator does not understand are kept as [`PropertyType::Unsupported`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Declared type of a node or relationship property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Categorical text, drawn from a value list
    String,
    /// 64-bit signed integer, drawn from a numeric range rule
    Integer,
    /// Floating point number rounded to two decimals
    Float,
    /// Boolean with an optional `probability_true` rule
    Boolean,
    /// Calendar date (day granularity)
    Date,
    /// Local date and time (sub-second granularity)
    DateTime,
    /// Any other declared type name, preserved verbatim
    Unsupported(String),
}

impl PropertyType {
    /// Parse a declared type name. Matching is case-insensitive.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Self::String,
            "integer" | "int" | "long" => Self::Integer,
            "float" | "double" | "decimal" => Self::Float,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "datetime" | "date_time" | "localdatetime" => Self::DateTime,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    /// Canonical name as written in schema documents.
    pub fn name(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Unsupported(name) => name,
        }
    }

    /// Key of this type's table inside `type_ranges` in the generation rules.
    pub fn rule_key(&self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// Whether values of this type are points in time.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PropertyType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(PropertyType::parse(&name))
    }
}

/// Type of a node label's identifier property.
///
/// Only String and Integer identifiers can be assigned sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    /// `"{Label}_{counter:04}"`
    String,
    /// Raw counter
    Integer,
}

impl TryFrom<&PropertyType> for IdType {
    type Error = String;

    fn try_from(value: &PropertyType) -> Result<Self, Self::Error> {
        match value {
            PropertyType::String => Ok(IdType::String),
            PropertyType::Integer => Ok(IdType::Integer),
            other => Err(other.name().to_string()),
        }
    }
}
