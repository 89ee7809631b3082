//! `verify`: read an emitted script unit by unit and report what a loader
//! would execute.

use anyhow::Context;
use clap::Args;
use datagen_cypher::parse_script;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments of the `verify` subcommand.
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Script to verify
    pub script: PathBuf,
}

/// Totals of a verified script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of `:param`/statement units
    pub units: usize,
    /// Rows across all payloads
    pub rows: usize,
}

/// Parse the script and check that every statement consumes its parameter.
pub fn run(args: &VerifyArgs) -> anyhow::Result<VerifyReport> {
    let text = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {:?}", args.script))?;
    let units = parse_script(&text)
        .with_context(|| format!("Failed to parse script {:?}", args.script))?;

    let mut report = VerifyReport::default();
    let mut unreferenced = Vec::new();
    for unit in &units {
        info!(
            "Line {}: ${} with {} rows",
            unit.line,
            unit.parameter,
            unit.rows()
        );
        if !unit.references_parameter() {
            warn!(
                "Line {}: statement does not reference ${}",
                unit.line, unit.parameter
            );
            unreferenced.push(unit.parameter.clone());
        }
        report.units += 1;
        report.rows += unit.rows();
    }

    if !unreferenced.is_empty() {
        anyhow::bail!(
            "{} statement(s) do not reference their parameter: {}",
            unreferenced.len(),
            unreferenced.join(", ")
        );
    }

    info!(
        "Verified {} units with {} rows in {}",
        report.units,
        report.rows,
        args.script.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify_text(text: &str) -> anyhow::Result<VerifyReport> {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.cypher");
        fs::write(&script, text).unwrap();
        run(&VerifyArgs { script })
    }

    #[test]
    fn test_verify_counts_units_and_rows() {
        let report = verify_text(
            "// header\n\
             :param nodes_Tag => [{\"tagID\":\"Tag_0001\"},{\"tagID\":\"Tag_0002\"}];\n\
             UNWIND $nodes_Tag AS node_props\n\
             MERGE (n:Tag { tagID: node_props.tagID })\n\
             SET n += node_props;\n\n",
        )
        .unwrap();
        assert_eq!(report, VerifyReport { units: 1, rows: 2 });
    }

    #[test]
    fn test_verify_rejects_unreferenced_parameter() {
        let err = verify_text(":param nodes_Tag => [];\nUNWIND $other AS row RETURN row;\n")
            .unwrap_err();
        assert!(err.to_string().contains("nodes_Tag"));
    }

    #[test]
    fn test_verify_reports_parse_errors() {
        let err = verify_text(":param p => [1]\nRETURN 1;\n").unwrap_err();
        assert!(format!("{err:#}").contains("expected ';'"));
    }
}
