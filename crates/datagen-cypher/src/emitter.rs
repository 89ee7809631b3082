//! Cypher load-script emission.
//!
//! Generated records are grouped by node label and by
//! `(source label, relationship type, target label)` and written as
//! `:param` payloads followed by an `UNWIND` statement:
//!
//! ```text
//! // --- Creating nodes for Label: Customer ---
//! :param nodes_Customer => [{"customerID":"Customer_0001","name":"Ada"}];
//! UNWIND $nodes_Customer AS node_props
//! MERGE (n:Customer { customerID: node_props.customerID })
//! SET n += node_props;
//!
//! // --- Creating relationships: (Customer)-[:PLACED]->(Order) ---
//! :param rels_Customer_PLACED_Order => [{"source_id":"Customer_0001","target_id":3,"properties":{}}];
//! UNWIND $rels_Customer_PLACED_Order AS rel_data
//! MATCH (a:Customer { customerID: rel_data.source_id })
//! MATCH (b:Order { orderID: rel_data.target_id })
//! MERGE (a)-[r:PLACED]->(b)
//! SET r = rel_data.properties;
//! ```
//!
//! Every unit is a `:param` line, the statement lines, a `;` ending the last
//! statement line, and one blank line. Node groups always come before
//! relationship groups.

use crate::error::EmitError;
use crate::escape::{escape_identifier, sanitize_param_name};
use chrono::NaiveDateTime;
use datagen_core::{
    GeneratedNode, GeneratedRelationship, IdProperty, InputFiles, NodeId, PropertyMap,
};
use datagen_generator::GenerationSummary;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::hash::Hash;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Default output file name.
pub const DEFAULT_OUTPUT_FILENAME: &str = "generated_data.cypher";

/// Metadata recorded in the script header.
#[derive(Debug, Clone)]
pub struct ScriptHeader<'a> {
    /// Generation timestamp
    pub generated_at: NaiveDateTime,
    /// Input documents of the run
    pub files: &'a InputFiles,
    /// Run totals
    pub summary: &'a GenerationSummary,
}

/// Counts of what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// `:param`/statement units written for nodes
    pub node_units: usize,
    /// `:param`/statement units written for relationships
    pub relationship_units: usize,
    /// Node rows written
    pub nodes_written: usize,
    /// Relationship rows written
    pub relationships_written: usize,
}

/// One row of a relationship payload.
#[derive(Serialize)]
struct RelationshipRow<'a> {
    source_id: &'a NodeId,
    target_id: &'a NodeId,
    properties: &'a PropertyMap,
}

/// Hands out parameter names, suffixing names that sanitize to the same text.
#[derive(Default)]
struct ParamNames {
    used: HashSet<String>,
}

impl ParamNames {
    fn allocate(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Writes generated records as a parameterized Cypher script.
pub struct CypherEmitter<'a> {
    id_properties: &'a BTreeMap<String, IdProperty>,
    batch_size: Option<usize>,
}

impl<'a> CypherEmitter<'a> {
    /// Create an emitter. `id_properties` names the identifier property of
    /// every label.
    pub fn new(id_properties: &'a BTreeMap<String, IdProperty>) -> Self {
        Self {
            id_properties,
            batch_size: None,
        }
    }

    /// Split each group into units of at most `batch_size` rows. Zero means
    /// one unit per group.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = (batch_size > 0).then_some(batch_size);
        self
    }

    /// Write the complete script to a file.
    pub fn write_to_file(
        &self,
        path: &Path,
        header: &ScriptHeader<'_>,
        nodes: &[GeneratedNode],
        relationships: &[GeneratedRelationship],
    ) -> Result<EmitStats, EmitError> {
        info!("Generating Cypher script: {}", path.display());
        let file = File::create(path).map_err(|source| EmitError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let stats = self.write_script(&mut out, header, nodes, relationships)?;
        out.flush()?;
        info!("Successfully generated Cypher script: {}", path.display());
        Ok(stats)
    }

    /// Write the complete script: header, constraint recommendations, node
    /// groups, then relationship groups.
    pub fn write_script<W: Write>(
        &self,
        out: &mut W,
        header: &ScriptHeader<'_>,
        nodes: &[GeneratedNode],
        relationships: &[GeneratedRelationship],
    ) -> Result<EmitStats, EmitError> {
        self.write_header(out, header)?;
        self.write_constraints(out)?;

        let mut names = ParamNames::default();
        let mut stats = EmitStats::default();
        info!("Writing node creation Cypher...");
        self.write_nodes(out, nodes, &mut names, &mut stats)?;
        info!("Writing relationship creation Cypher...");
        self.write_relationships(out, relationships, &mut names, &mut stats)?;
        Ok(stats)
    }

    /// Write the header comment block.
    pub fn write_header<W: Write>(
        &self,
        out: &mut W,
        header: &ScriptHeader<'_>,
    ) -> Result<(), EmitError> {
        let files = header.files;
        let summary = header.summary;
        writeln!(
            out,
            "// Generated by graph-datagen on {}",
            header.generated_at.format("%Y-%m-%dT%H:%M:%S")
        )?;
        writeln!(out, "// Schema: {}", files.schema_analysis.display())?;
        writeln!(out, "// Plan: {}", files.generation_plan.display())?;
        writeln!(out, "// Value Lists: {}", files.value_lists.display())?;
        if let Some(cardinality) = &files.cardinality_rules {
            writeln!(out, "// Cardinality Rules: {}", cardinality.display())?;
        }
        writeln!(out, "// Generation Rules: {}", files.generation_rules.display())?;
        writeln!(out, "// Seed: {}", summary.seed)?;
        writeln!(
            out,
            "// Date Consistency Enforced: {}",
            summary.enforce_date_consistency
        )?;
        writeln!(out, "// Total Nodes Planned: {}", summary.nodes_planned)?;
        writeln!(out, "// Total Nodes Generated: {}", summary.nodes_generated)?;
        writeln!(
            out,
            "// Total Relationships Generated: {}",
            summary.relationships_generated
        )?;
        writeln!(out)?;
        Ok(())
    }

    /// Write unique-constraint recommendations for every identifier property,
    /// as comments.
    pub fn write_constraints<W: Write>(&self, out: &mut W) -> Result<(), EmitError> {
        writeln!(
            out,
            "// --- Recommended Indexes/Constraints (run manually before loading data) ---"
        )?;
        for (label, id) in self.id_properties {
            writeln!(
                out,
                "// CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE;",
                escape_identifier(label),
                escape_identifier(&id.name)
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_nodes<W: Write>(
        &self,
        out: &mut W,
        nodes: &[GeneratedNode],
        names: &mut ParamNames,
        stats: &mut EmitStats,
    ) -> Result<(), EmitError> {
        for (label, group) in group_by(nodes, |node| node.label.as_str()) {
            let Some(id) = self.id_properties.get(label) else {
                warn!(
                    "Cannot write Cypher for label '{}': Missing ID property info.",
                    label
                );
                continue;
            };
            let label_ident = escape_identifier(label);
            let id_ident = escape_identifier(&id.name);
            let base = format!("nodes_{}", sanitize_param_name(label));

            let chunks = self.chunks(&group);
            let total = chunks.len();
            for (i, chunk) in chunks.into_iter().enumerate() {
                let param = names.allocate(chunk_name(&base, i, total));
                writeln!(
                    out,
                    "// --- Creating nodes for Label: {}{} ---",
                    label,
                    chunk_suffix(i, total)
                )?;
                let rows: Vec<&PropertyMap> = chunk.iter().map(|node| &node.properties).collect();
                write_param(out, &param, &rows)?;
                writeln!(out, "UNWIND ${param} AS node_props")?;
                writeln!(
                    out,
                    "MERGE (n:{label_ident} {{ {id_ident}: node_props.{id_ident} }})"
                )?;
                writeln!(out, "SET n += node_props;")?;
                writeln!(out)?;

                stats.node_units += 1;
                stats.nodes_written += chunk.len();
            }
        }
        Ok(())
    }

    fn write_relationships<W: Write>(
        &self,
        out: &mut W,
        relationships: &[GeneratedRelationship],
        names: &mut ParamNames,
        stats: &mut EmitStats,
    ) -> Result<(), EmitError> {
        let groups = group_by(relationships, |rel| {
            (
                rel.source_label.as_str(),
                rel.rel_type.as_str(),
                rel.target_label.as_str(),
            )
        });

        for ((source_label, rel_type, target_label), group) in groups {
            let (Some(source_id), Some(target_id)) = (
                self.id_properties.get(source_label),
                self.id_properties.get(target_label),
            ) else {
                warn!(
                    "Cannot write Cypher for ({})-[:{}]->({}): Missing ID property info.",
                    source_label, rel_type, target_label
                );
                continue;
            };
            let source_ident = escape_identifier(source_label);
            let target_ident = escape_identifier(target_label);
            let type_ident = escape_identifier(rel_type);
            let source_key = escape_identifier(&source_id.name);
            let target_key = escape_identifier(&target_id.name);
            let base = format!(
                "rels_{}_{}_{}",
                sanitize_param_name(source_label),
                sanitize_param_name(rel_type),
                sanitize_param_name(target_label)
            );

            let chunks = self.chunks(&group);
            let total = chunks.len();
            for (i, chunk) in chunks.into_iter().enumerate() {
                let param = names.allocate(chunk_name(&base, i, total));
                writeln!(
                    out,
                    "// --- Creating relationships: ({})-[:{}]->({}){} ---",
                    source_label,
                    rel_type,
                    target_label,
                    chunk_suffix(i, total)
                )?;
                let rows: Vec<RelationshipRow<'_>> = chunk
                    .iter()
                    .map(|rel| RelationshipRow {
                        source_id: &rel.source_id,
                        target_id: &rel.target_id,
                        properties: &rel.properties,
                    })
                    .collect();
                write_param(out, &param, &rows)?;
                writeln!(out, "UNWIND ${param} AS rel_data")?;
                writeln!(
                    out,
                    "MATCH (a:{source_ident} {{ {source_key}: rel_data.source_id }})"
                )?;
                writeln!(
                    out,
                    "MATCH (b:{target_ident} {{ {target_key}: rel_data.target_id }})"
                )?;
                writeln!(out, "MERGE (a)-[r:{type_ident}]->(b)")?;
                writeln!(out, "SET r = rel_data.properties;")?;
                writeln!(out)?;

                stats.relationship_units += 1;
                stats.relationships_written += chunk.len();
            }
        }
        Ok(())
    }

    fn chunks<'g, T>(&self, group: &'g [T]) -> Vec<&'g [T]> {
        match self.batch_size {
            Some(size) => group.chunks(size).collect(),
            None => vec![group],
        }
    }
}

/// Group records by key, keeping groups in first-seen order.
fn group_by<'r, T, K, F>(records: &'r [T], key: F) -> Vec<(K, Vec<&'r T>)>
where
    K: Eq + Hash + Copy,
    F: Fn(&'r T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'r T>)> = Vec::new();
    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k, groups.len());
                groups.push((k, vec![record]));
            }
        }
    }
    groups
}

fn chunk_name(base: &str, index: usize, total: usize) -> String {
    if total > 1 {
        format!("{}_{}", base, index + 1)
    } else {
        base.to_string()
    }
}

fn chunk_suffix(index: usize, total: usize) -> String {
    if total > 1 {
        format!(" (batch {}/{})", index + 1, total)
    } else {
        String::new()
    }
}

fn write_param<W: Write, T: Serialize>(out: &mut W, name: &str, rows: &T) -> Result<(), EmitError> {
    write!(out, ":param {name} => ")?;
    serde_json::to_writer(&mut *out, rows)?;
    writeln!(out, ";")?;
    Ok(())
}
