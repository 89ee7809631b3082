//! Relationship generation.
//!
//! Two cardinality strategies:
//!
//! - **Explicit rule** (`{min, max}` for the relationship type): every source
//!   draws `k` in `[min, max]` and is connected to `k` distinct targets.
//!   Targets are sampled without replacement per source only; different
//!   sources may share targets.
//! - **Hybrid default** (no rule): both identifier pools are shuffled and
//!   paired element-wise, giving `min(|sources|, |targets|)` relationships and
//!   a bijection between the smaller pool and a random subset of the larger.

use crate::context::GenerationContext;
use crate::synthesizer::{EndpointContext, PropertySynthesizer, SynthesisError};
use datagen_core::{
    CardinalityRule, CardinalityRules, GeneratedNode, GeneratedRelationship, IdProperty, NodeId,
    RelationshipDefinition,
};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// Per-source relationship bounds after clamping to the available targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardinalityBounds {
    /// Minimum relationships per source
    pub min: usize,
    /// Maximum relationships per source
    pub max: usize,
}

impl CardinalityBounds {
    /// Clamp a configured rule so that `min <= max <= available_targets`.
    ///
    /// Negative bounds are raised to zero; `min > max` raises `max` to `min`
    /// before the target clamp, then `min` is lowered to the clamped `max`.
    pub fn clamp(rel_type: &str, rule: CardinalityRule, available_targets: usize) -> Self {
        let to_count = |bound: i64, name: &str| -> usize {
            if bound < 0 {
                warn!(
                    "Cardinality rule for '{}' has negative {} ({}). Using 0.",
                    rel_type, name, bound
                );
            }
            usize::try_from(bound.max(0)).unwrap_or(usize::MAX)
        };
        let mut min = to_count(rule.min, "min");
        let mut max = to_count(rule.max, "max");

        if min > max {
            warn!(
                "Cardinality rule for '{}' has min ({}) > max ({}). Clamping max to min.",
                rel_type, min, max
            );
            max = min;
        }
        max = max.min(available_targets);
        if min > max {
            warn!(
                "Cardinality rule for '{}' requires min ({}) > available targets ({}). Setting min to {}.",
                rel_type, min, available_targets, max
            );
            min = max;
        }

        Self { min, max }
    }
}

/// Generates relationships for each relationship definition.
pub struct RelationshipGenerator<'a> {
    id_properties: &'a BTreeMap<String, IdProperty>,
    cardinality_rules: &'a CardinalityRules,
    synthesizer: &'a PropertySynthesizer<'a>,
    enforce_date_consistency: bool,
}

impl<'a> RelationshipGenerator<'a> {
    /// Create a relationship generator.
    pub fn new(
        id_properties: &'a BTreeMap<String, IdProperty>,
        cardinality_rules: &'a CardinalityRules,
        synthesizer: &'a PropertySynthesizer<'a>,
        enforce_date_consistency: bool,
    ) -> Self {
        Self {
            id_properties,
            cardinality_rules,
            synthesizer,
            enforce_date_consistency,
        }
    }

    /// Generate the relationships of one definition.
    ///
    /// Definitions that cannot be wired (incomplete, empty identifier pool,
    /// missing identifier metadata) produce nothing and log a warning.
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        ctx: &GenerationContext,
        definition: &RelationshipDefinition,
    ) -> Result<Vec<GeneratedRelationship>, SynthesisError> {
        if !definition.is_complete() {
            warn!(
                "Skipping relationship definition due to missing 'type', 'source', or 'target': {:?}",
                definition
            );
            return Ok(Vec::new());
        }

        let rel_type = definition.rel_type.as_str();
        let (source_label, target_label) = (definition.source.as_str(), definition.target.as_str());
        info!(
            "Generating relationships of type: ({})-[:{}]->({})",
            source_label, rel_type, target_label
        );

        let sources = ctx.id_pool(source_label);
        let targets = ctx.id_pool(target_label);
        if sources.is_empty() || targets.is_empty() {
            warn!(
                "Skipping relationship type '{}': No generated nodes found for source '{}' ({}) or target '{}' ({}).",
                rel_type,
                source_label,
                sources.len(),
                target_label,
                targets.len()
            );
            return Ok(Vec::new());
        }
        if !self.id_properties.contains_key(source_label)
            || !self.id_properties.contains_key(target_label)
        {
            warn!(
                "Skipping relationship type '{}': Missing ID property info for source '{}' or target '{}'.",
                rel_type, source_label, target_label
            );
            return Ok(Vec::new());
        }

        let pairs = match self.cardinality_rules.get(rel_type) {
            Some(rule) => {
                let bounds = CardinalityBounds::clamp(rel_type, *rule, targets.len());
                info!(
                    "Using cardinality rule for '{}': min={}, max={} per source.",
                    rel_type, bounds.min, bounds.max
                );
                if bounds.max == 0 {
                    info!(
                        "Cardinality rule for '{}' specifies 0 relationships. Skipping.",
                        rel_type
                    );
                    return Ok(Vec::new());
                }
                explicit_pairs(rng, sources, targets, bounds)
            }
            None => {
                info!(
                    "Using hybrid default cardinality for '{}' ({} sources, {} targets).",
                    rel_type,
                    sources.len(),
                    targets.len()
                );
                hybrid_pairs(rng, sources, targets)
            }
        };

        let endpoints = self.endpoint_lookup(ctx, definition);
        let mut relationships = Vec::with_capacity(pairs.len());
        for (source_id, target_id) in pairs {
            let context = endpoints.as_ref().map(|(by_source, by_target)| {
                EndpointContext::from_endpoints(
                    by_source.get(&source_id).copied(),
                    by_target.get(&target_id).copied(),
                )
            });
            let properties = self.synthesizer.synthesize_properties(
                rng,
                rel_type,
                &definition.properties,
                None,
                context.as_ref(),
            )?;
            relationships.push(GeneratedRelationship {
                source_label: source_label.to_string(),
                source_id,
                target_label: target_label.to_string(),
                target_id,
                rel_type: rel_type.to_string(),
                properties,
            });
        }

        info!(
            "Generated {} relationships of type '{}'.",
            relationships.len(),
            rel_type
        );
        Ok(relationships)
    }

    /// Endpoint node lookups, built only when date consistency is enforced
    /// and the relationship has temporal properties.
    #[allow(clippy::type_complexity)]
    fn endpoint_lookup<'c>(
        &self,
        ctx: &'c GenerationContext,
        definition: &RelationshipDefinition,
    ) -> Option<(
        HashMap<&'c NodeId, &'c GeneratedNode>,
        HashMap<&'c NodeId, &'c GeneratedNode>,
    )> {
        let has_temporal = definition
            .properties
            .iter()
            .any(|p| p.property_type.as_ref().is_some_and(|t| t.is_temporal()));
        if !self.enforce_date_consistency || !has_temporal {
            return None;
        }
        Some((
            ctx.nodes_by_id(&definition.source),
            ctx.nodes_by_id(&definition.target),
        ))
    }
}

/// Strategy A: per-source sampling without replacement.
fn explicit_pairs<R: Rng>(
    rng: &mut R,
    sources: &[NodeId],
    targets: &[NodeId],
    bounds: CardinalityBounds,
) -> Vec<(NodeId, NodeId)> {
    let mut pairs = Vec::new();
    for source in sources {
        let k = rng.gen_range(bounds.min..=bounds.max).min(targets.len());
        if k == 0 {
            continue;
        }
        for target_index in index::sample(rng, targets.len(), k) {
            pairs.push((source.clone(), targets[target_index].clone()));
        }
    }
    pairs
}

/// Strategy B: independent shuffles paired element-wise.
fn hybrid_pairs<R: Rng>(
    rng: &mut R,
    sources: &[NodeId],
    targets: &[NodeId],
) -> Vec<(NodeId, NodeId)> {
    let mut sources = sources.to_vec();
    let mut targets = targets.to_vec();
    sources.shuffle(rng);
    targets.shuffle(rng);
    sources.into_iter().zip(targets).collect()
}
