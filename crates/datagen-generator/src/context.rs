//! State accumulated over one generation run.

use datagen_core::{GeneratedNode, GeneratedRelationship, NodeId};
use std::collections::HashMap;

/// Everything generated during a run.
///
/// Owned by the run, filled by the node generator, read by the relationship
/// generator (identifier pools and endpoint lookup), then handed to the
/// emitter.
#[derive(Debug, Default)]
pub struct GenerationContext {
    /// Identifiers generated per label, in creation order
    id_pools: HashMap<String, Vec<NodeId>>,
    /// All node records, in creation order
    nodes: Vec<GeneratedNode>,
    /// All relationship records, in creation order
    relationships: Vec<GeneratedRelationship>,
}

impl GenerationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generated node and add its identifier to the label's pool.
    pub fn add_node(&mut self, node: GeneratedNode) {
        self.id_pools
            .entry(node.label.clone())
            .or_default()
            .push(node.id.clone());
        self.nodes.push(node);
    }

    /// Record generated relationships.
    pub fn add_relationships(&mut self, relationships: impl IntoIterator<Item = GeneratedRelationship>) {
        self.relationships.extend(relationships);
    }

    /// Identifier pool of a label (empty when nothing was generated).
    pub fn id_pool(&self, label: &str) -> &[NodeId] {
        self.id_pools.get(label).map_or(&[], Vec::as_slice)
    }

    /// All generated nodes.
    pub fn nodes(&self) -> &[GeneratedNode] {
        &self.nodes
    }

    /// All generated relationships.
    pub fn relationships(&self) -> &[GeneratedRelationship] {
        &self.relationships
    }

    /// Nodes of one label keyed by identifier.
    pub fn nodes_by_id(&self, label: &str) -> HashMap<&NodeId, &GeneratedNode> {
        self.nodes
            .iter()
            .filter(|node| node.label == label)
            .map(|node| (&node.id, node))
            .collect()
    }

    /// Consume the context, returning node and relationship records.
    pub fn into_records(self) -> (Vec<GeneratedNode>, Vec<GeneratedRelationship>) {
        (self.nodes, self.relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagen_core::PropertyMap;

    #[test]
    fn test_add_node_fills_pool() {
        let mut ctx = GenerationContext::new();
        ctx.add_node(GeneratedNode::new(
            "Customer",
            NodeId::String("Customer_0001".into()),
            PropertyMap::new(),
        ));
        ctx.add_node(GeneratedNode::new("Order", NodeId::Integer(1), PropertyMap::new()));
        ctx.add_node(GeneratedNode::new(
            "Customer",
            NodeId::String("Customer_0002".into()),
            PropertyMap::new(),
        ));

        assert_eq!(
            ctx.id_pool("Customer"),
            &[
                NodeId::String("Customer_0001".into()),
                NodeId::String("Customer_0002".into())
            ]
        );
        assert_eq!(ctx.id_pool("Order"), &[NodeId::Integer(1)]);
        assert!(ctx.id_pool("Product").is_empty());
        assert_eq!(ctx.nodes().len(), 3);

        let customers = ctx.nodes_by_id("Customer");
        assert_eq!(customers.len(), 2);
        assert!(customers.contains_key(&NodeId::String("Customer_0002".into())));
    }

    #[test]
    fn test_into_records_keeps_generation_order() {
        let mut ctx = GenerationContext::new();
        ctx.add_node(GeneratedNode::new("Order", NodeId::Integer(2), PropertyMap::new()));
        ctx.add_node(GeneratedNode::new("Order", NodeId::Integer(1), PropertyMap::new()));
        ctx.add_relationships(vec![GeneratedRelationship {
            source_label: "Order".into(),
            source_id: NodeId::Integer(2),
            target_label: "Order".into(),
            target_id: NodeId::Integer(1),
            rel_type: "FOLLOWS".into(),
            properties: PropertyMap::new(),
        }]);

        let (nodes, relationships) = ctx.into_records();
        let ids: Vec<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        assert_eq!(ids, vec![&NodeId::Integer(2), &NodeId::Integer(1)]);
        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].rel_type, "FOLLOWS");
    }
}
