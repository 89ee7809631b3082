//! Graph schema analysis documents.
//!
//! The schema analysis describes node labels (with their properties and
//! identifier property) and relationship definitions between labels:
//!
//! ```json
//! {
//!   "nodes": {
//!     "Customer": {
//!       "properties": [{"name": "customerID", "type": "String"}],
//!       "id_property": "customerID"
//!     }
//!   },
//!   "relationships": [
//!     {"type": "PLACED", "source": "Customer", "target": "Order", "properties": []}
//!   ]
//! }
//! ```

use crate::error::ConfigError;
use crate::types::{IdType, PropertyType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared property of a node label or relationship type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDefinition {
    /// Simple property name
    #[serde(default)]
    pub name: String,

    /// Declared type; properties without one are skipped during generation
    #[serde(rename = "type", default)]
    pub property_type: Option<PropertyType>,

    /// Free-form constraints carried through from schema analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<serde_json::Value>,
}

impl PropertyDefinition {
    /// Create a new typed property definition.
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type: Some(property_type),
            constraints: None,
        }
    }
}

/// A node label definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeDefinition {
    /// Declared properties, in document order
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,

    /// Name of the identifier property
    #[serde(default)]
    pub id_property: Option<String>,
}

impl NodeDefinition {
    /// Get a property definition by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A relationship definition between two node labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelationshipDefinition {
    /// Relationship type
    #[serde(rename = "type", default)]
    pub rel_type: String,

    /// Source node label
    #[serde(default)]
    pub source: String,

    /// Target node label
    #[serde(default)]
    pub target: String,

    /// Declared relationship properties
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl RelationshipDefinition {
    /// Whether type, source and target are all present.
    pub fn is_complete(&self) -> bool {
        !self.rel_type.is_empty() && !self.source.is_empty() && !self.target.is_empty()
    }
}

/// Resolved identifier property metadata for a node label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdProperty {
    /// Property name
    pub name: String,
    /// Identifier type
    pub id_type: IdType,
}

/// The schema analysis document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaAnalysis {
    /// Node label definitions keyed by label
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeDefinition>,

    /// Relationship definitions, in document order
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

impl SchemaAnalysis {
    /// Get a node definition by label.
    pub fn get_node(&self, label: &str) -> Option<&NodeDefinition> {
        self.nodes.get(label)
    }

    /// Get all node labels.
    pub fn labels(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Resolve the identifier property of a label.
    ///
    /// Fails when the label does not name an `id_property`, when that
    /// property is not declared (or untyped), or when its type is neither
    /// String nor Integer.
    pub fn id_property(&self, label: &str) -> Result<Option<IdProperty>, ConfigError> {
        let Some(node) = self.get_node(label) else {
            return Ok(None);
        };

        let name = match node.id_property.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ConfigError::MissingIdProperty {
                    label: label.to_string(),
                })
            }
        };

        let definition =
            node.get_property(name)
                .ok_or_else(|| ConfigError::IdPropertyNotDeclared {
                    label: label.to_string(),
                    property: name.to_string(),
                })?;

        let declared = definition
            .property_type
            .as_ref()
            .ok_or_else(|| ConfigError::IdPropertyUntyped {
                label: label.to_string(),
                property: name.to_string(),
            })?;

        let id_type =
            IdType::try_from(declared).map_err(|found| ConfigError::UnsupportedIdType {
                label: label.to_string(),
                property: name.to_string(),
                found,
            })?;

        Ok(Some(IdProperty {
            name: name.to_string(),
            id_type,
        }))
    }

    /// Compute immediate-neighbor connectivity for every node label.
    pub fn connectivity(&self) -> Connectivity {
        let mut connectivity = Connectivity::default();
        for label in self.nodes.keys() {
            connectivity.outgoing.entry(label.clone()).or_default();
            connectivity.incoming.entry(label.clone()).or_default();
        }

        for rel in &self.relationships {
            if !rel.is_complete() {
                tracing::warn!("Skipping incomplete relationship definition: {:?}", rel);
                continue;
            }
            connectivity
                .outgoing
                .entry(rel.source.clone())
                .or_default()
                .push(Neighbor {
                    rel_type: rel.rel_type.clone(),
                    label: rel.target.clone(),
                });
            connectivity
                .incoming
                .entry(rel.target.clone())
                .or_default()
                .push(Neighbor {
                    rel_type: rel.rel_type.clone(),
                    label: rel.source.clone(),
                });
        }

        for neighbors in connectivity
            .outgoing
            .values_mut()
            .chain(connectivity.incoming.values_mut())
        {
            neighbors.sort();
        }

        connectivity
    }
}

/// A neighboring label reachable through one relationship type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Neighbor {
    /// Relationship type
    pub rel_type: String,
    /// Label at the other end
    pub label: String,
}

/// Immediate neighbors of each label, in both directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connectivity {
    /// Label -> (relationship type, target label)
    pub outgoing: BTreeMap<String, Vec<Neighbor>>,
    /// Label -> (relationship type, source label)
    pub incoming: BTreeMap<String, Vec<Neighbor>>,
}

impl Connectivity {
    /// Labels that take part in no relationship at all.
    pub fn isolated_labels(&self) -> Vec<&str> {
        self.outgoing
            .iter()
            .filter(|(label, out)| {
                out.is_empty() && self.incoming.get(*label).map_or(true, Vec::is_empty)
            })
            .map(|(label, _)| label.as_str())
            .collect()
    }
}
