//! Core types for graph-datagen.
//!
//! This crate provides the foundational types shared by the generator and
//! the Cypher emitter:
//!
//! - [`SchemaAnalysis`] - Node labels, identifier properties and relationship definitions
//! - [`PropertyType`] - Closed set of declared property types
//! - [`PropertyValue`] / [`NodeId`] - Synthesized values and identifiers
//! - [`GeneratedNode`] / [`GeneratedRelationship`] - Records produced by a run
//! - [`ConfigBundle`] - The configuration loader for all input documents
//!
//! # Architecture
//!
//! ```text
//! datagen-core (this crate)
//!    │
//!    ├─── datagen-generator  (nodes, relationships, property synthesis)
//!    │
//!    └─── datagen-cypher     (parameterized Cypher output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_core::{PropertyType, SchemaAnalysis};
//!
//! let schema: SchemaAnalysis = serde_json::from_str(r#"{
//!     "nodes": {
//!         "Customer": {
//!             "properties": [{"name": "customerID", "type": "String"}],
//!             "id_property": "customerID"
//!         }
//!     },
//!     "relationships": []
//! }"#).unwrap();
//!
//! let customer = schema.get_node("Customer").unwrap();
//! assert_eq!(customer.properties[0].property_type, Some(PropertyType::String));
//! ```

pub mod config;
pub mod error;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use config::{
    CardinalityRule, CardinalityRules, ConfigBundle, GenerationPlan, GenerationRules, InputFiles,
    RuleMatch, RuleSource, RunManifest, ValueLists,
};
pub use error::ConfigError;
pub use schema::{
    Connectivity, IdProperty, Neighbor, NodeDefinition, PropertyDefinition,
    RelationshipDefinition, SchemaAnalysis,
};
pub use types::{IdType, PropertyType};
pub use values::{GeneratedNode, GeneratedRelationship, NodeId, PropertyMap, PropertyValue};
