//! Command-line interface for graph-datagen
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Read schema_analysis.json, generation_plan.json, value_lists.json,
//! # generation_rules.json and (optionally) cardinality_rules.json from ./config
//! graph-datagen generate --config-dir ./config --output generated_data.cypher
//!
//! # Reproducible run: fixed seed and pinned "now" for relative dates
//! graph-datagen generate --config-dir ./config \
//!   --seed 42 --now 2024-03-15T09:00:00 \
//!   --enforce-date-consistency --batch-size 5000
//!
//! # Input names and flags from a YAML run manifest
//! graph-datagen generate --config-dir ./config --manifest run.yaml
//! ```
//!
//! ## Inspect
//! ```bash
//! graph-datagen inspect --config-dir ./config --output connectivity.txt
//! ```
//!
//! ## Verify
//! ```bash
//! graph-datagen verify generated_data.cypher
//! ```

use clap::{Parser, Subcommand};
use graph_datagen::commands::{generate, inspect, verify};
use graph_datagen::{GenerateArgs, InspectArgs, VerifyArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graph-datagen")]
#[command(about = "A schema-driven synthetic graph data generator that emits Cypher load scripts")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate nodes and relationships and write a Cypher load script
    Generate(GenerateArgs),

    /// Report how the node labels of a schema connect to each other
    Inspect(InspectArgs),

    /// Read an emitted script back and check every parameter/statement unit
    Verify(VerifyArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let report = generate::run(&args)?;
            println!(
                "Generated {} nodes and {} relationships into {} (seed {})",
                report.summary.nodes_generated,
                report.summary.relationships_generated,
                report.output.display(),
                report.summary.seed
            );
        }
        Commands::Inspect(args) => {
            inspect::run(&args)?;
        }
        Commands::Verify(args) => {
            let report = verify::run(&args)?;
            println!(
                "{}: {} units, {} rows",
                args.script.display(),
                report.units,
                report.rows
            );
        }
    }

    Ok(())
}
