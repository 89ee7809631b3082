//! `inspect`: plain-text connectivity report for a schema analysis document.

use anyhow::Context;
use clap::Args;
use datagen_core::config::DEFAULT_SCHEMA_FILENAME;
use datagen_core::{Neighbor, SchemaAnalysis};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Arguments of the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Base directory for a relative schema path
    #[arg(long, default_value = ".", env = "DATAGEN_CONFIG_DIR")]
    pub config_dir: PathBuf,

    /// Schema analysis document
    #[arg(long, default_value = DEFAULT_SCHEMA_FILENAME)]
    pub schema: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Load the schema and print (or write) its connectivity report.
pub fn run(args: &InspectArgs) -> anyhow::Result<String> {
    let path = if args.schema.is_absolute() {
        args.schema.clone()
    } else {
        args.config_dir.join(&args.schema)
    };
    info!("Loading schema from: {}", path.display());
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read schema {path:?}"))?;
    let schema: SchemaAnalysis = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schema {path:?}"))?;

    let report = render_report(&schema);
    match &args.output {
        Some(output) => {
            fs::write(output, &report)
                .with_context(|| format!("Failed to write report to {output:?}"))?;
            info!("Successfully wrote connectivity report to {}", output.display());
        }
        None => print!("{report}"),
    }
    Ok(report)
}

/// Render the connectivity of every label, with the property names of each
/// label and each neighbor.
pub fn render_report(schema: &SchemaAnalysis) -> String {
    let connectivity = schema.connectivity();
    let mut out = String::new();

    let _ = writeln!(out, "Schema Connectivity Report");
    let _ = writeln!(out, "==========================");
    let _ = writeln!(
        out,
        "{} node labels, {} relationship definitions",
        schema.nodes.len(),
        schema.relationships.len()
    );

    for (label, outgoing) in &connectivity.outgoing {
        let incoming = connectivity
            .incoming
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let _ = writeln!(out);
        let _ = writeln!(out, "Node: {}{}", label, property_suffix(schema, label));
        if outgoing.is_empty() && incoming.is_empty() {
            let _ = writeln!(out, "  (no relationships)");
            continue;
        }
        for Neighbor { rel_type, label: target } in outgoing {
            let _ = writeln!(
                out,
                "  -> [{}] -> {}{}",
                rel_type,
                target,
                property_suffix(schema, target)
            );
        }
        for Neighbor { rel_type, label: source } in incoming {
            let _ = writeln!(
                out,
                "  <- [{}] <- {}{}",
                rel_type,
                source,
                property_suffix(schema, source)
            );
        }
    }

    let isolated = connectivity.isolated_labels();
    if !isolated.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Isolated labels: {}", isolated.join(", "));
    }
    out
}

/// ` (a, b, c)` with the sorted property names of `label`, or nothing.
fn property_suffix(schema: &SchemaAnalysis, label: &str) -> String {
    let Some(node) = schema.get_node(label) else {
        return String::new();
    };
    let mut names: Vec<&str> = node
        .properties
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return String::new();
    }
    names.sort_unstable();
    format!(" ({})", names.join(", "))
}
