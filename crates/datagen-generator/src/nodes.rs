//! Node generation.

use crate::context::GenerationContext;
use crate::synthesizer::{PropertySynthesizer, SynthesisError};
use datagen_core::{GeneratedNode, IdProperty, IdType, NodeId, PropertyValue, SchemaAnalysis};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Log progress after this many nodes of a label.
const PROGRESS_INTERVAL: u64 = 1000;

/// Build the identifier for the `counter`-th node (1-based) of a label.
///
/// String identifiers are `{label}_{counter}` with the counter zero-padded to
/// four digits; integer identifiers are the counter itself.
pub fn sequential_id(label: &str, id_type: IdType, counter: u64) -> NodeId {
    match id_type {
        IdType::String => NodeId::String(format!("{label}_{counter:04}")),
        IdType::Integer => NodeId::Integer(i64::try_from(counter).unwrap_or(i64::MAX)),
    }
}

/// Generates the nodes of each planned label.
pub struct NodeGenerator<'a> {
    schema: &'a SchemaAnalysis,
    id_properties: &'a BTreeMap<String, IdProperty>,
    synthesizer: &'a PropertySynthesizer<'a>,
}

impl<'a> NodeGenerator<'a> {
    /// Create a node generator.
    pub fn new(
        schema: &'a SchemaAnalysis,
        id_properties: &'a BTreeMap<String, IdProperty>,
        synthesizer: &'a PropertySynthesizer<'a>,
    ) -> Self {
        Self {
            schema,
            id_properties,
            synthesizer,
        }
    }

    /// Generate `count` nodes of `label` into the context.
    ///
    /// Labels missing from the schema (or without identifier metadata) are
    /// skipped with a warning. Returns the number of nodes generated.
    pub fn generate_label<R: Rng>(
        &self,
        rng: &mut R,
        label: &str,
        count: u64,
        ctx: &mut GenerationContext,
    ) -> Result<u64, SynthesisError> {
        info!("Generating {} nodes for label: {}", count, label);

        let Some(definition) = self.schema.get_node(label) else {
            warn!(
                "Skipping node generation for label '{}': Not found in schema.",
                label
            );
            return Ok(0);
        };
        let Some(id_property) = self.id_properties.get(label) else {
            warn!(
                "Skipping node generation for label '{}': ID property info missing.",
                label
            );
            return Ok(0);
        };

        for counter in 1..=count {
            let id = sequential_id(label, id_property.id_type, counter);
            let mut properties = self.synthesizer.synthesize_properties(
                rng,
                label,
                &definition.properties,
                Some(&id_property.name),
                None,
            )?;
            properties.insert(id_property.name.clone(), PropertyValue::from(id.clone()));
            ctx.add_node(GeneratedNode::new(label, id, properties));

            if counter % PROGRESS_INTERVAL == 0 || counter == count {
                info!("Generated {}/{} nodes for {}...", counter, count, label);
            }
        }

        Ok(count)
    }
}
