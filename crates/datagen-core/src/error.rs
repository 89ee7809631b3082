//! Error types for configuration loading and schema validation.

use std::path::PathBuf;

/// Fatal configuration errors. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading a configuration file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a JSON configuration document
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error parsing a YAML run manifest
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The generation plan has no entries
    #[error("Generation plan is empty")]
    EmptyPlan,

    /// The schema analysis defines no node labels
    #[error("Schema analysis defines no nodes")]
    NoNodes,

    /// A node label does not name its identifier property
    #[error("No 'id_property' defined for node label '{label}'")]
    MissingIdProperty { label: String },

    /// The identifier property is not in the label's property list
    #[error("ID property '{property}' is not declared for node label '{label}'")]
    IdPropertyNotDeclared { label: String, property: String },

    /// The identifier property is declared without a type
    #[error("ID property '{property}' of node label '{label}' has no type")]
    IdPropertyUntyped { label: String, property: String },

    /// The identifier property type cannot be assigned sequentially
    #[error("ID property '{property}' of node label '{label}' has unsupported type '{found}' (expected String or Integer)")]
    UnsupportedIdType {
        label: String,
        property: String,
        found: String,
    },
}
