//! `generate`: load the configuration documents, generate nodes and
//! relationships, and write the Cypher load script.

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::Args;
use datagen_core::{InputFiles, RunManifest};
use datagen_cypher::{CypherEmitter, EmitStats, ScriptHeader, DEFAULT_OUTPUT_FILENAME};
use datagen_generator::{
    DataGenerator, DateResolver, FallbackPolicy, GenerationOutput, GenerationSummary,
    GeneratorOptions,
};
use std::path::PathBuf;
use tracing::info;

/// Arguments of the `generate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Base directory for relative input paths
    #[arg(long, default_value = ".", env = "DATAGEN_CONFIG_DIR")]
    pub config_dir: PathBuf,

    /// Schema analysis document (default: schema_analysis.json)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Generation plan document (default: generation_plan.json)
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Value lists document (default: value_lists.json)
    #[arg(long)]
    pub value_lists: Option<PathBuf>,

    /// Generation rules document (default: generation_rules.json)
    #[arg(long)]
    pub generation_rules: Option<PathBuf>,

    /// Cardinality rules document (optional, default: cardinality_rules.json)
    #[arg(long)]
    pub cardinality_rules: Option<PathBuf>,

    /// YAML run manifest naming the input documents and run flags
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Output script path
    #[arg(long, default_value = DEFAULT_OUTPUT_FILENAME)]
    pub output: PathBuf,

    /// Random seed (default: drawn from OS entropy and reported)
    #[arg(long, env = "DATAGEN_SEED")]
    pub seed: Option<u64>,

    /// Pin "now" for relative date expressions (e.g. 2024-03-15T09:00:00)
    #[arg(long, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Draw relationship dates no earlier than the dates of their endpoints
    /// (`--enforce-date-consistency=false` overrides a manifest `true`)
    #[arg(
        long,
        env = "ENFORCE_DATE_CONSISTENCY",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub enforce_date_consistency: Option<bool>,

    /// Fail on the first missing or malformed rule instead of falling back
    #[arg(long)]
    pub strict: bool,

    /// Maximum rows per :param batch (default: one batch per group)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("."),
            schema: None,
            plan: None,
            value_lists: None,
            generation_rules: None,
            cardinality_rules: None,
            manifest: None,
            output: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            seed: None,
            now: None,
            enforce_date_consistency: None,
            strict: false,
            batch_size: None,
        }
    }
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    DateResolver::new()
        .try_resolve(s)
        .map_err(|e| e.to_string())
}

/// Result of a `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Path the script was written to
    pub output: PathBuf,
    /// Generation totals
    pub summary: GenerationSummary,
    /// Emission totals
    pub stats: EmitStats,
}

impl GenerateArgs {
    /// Resolve input paths and run flags. Explicit flags win over manifest
    /// values, manifest values win over defaults.
    fn resolve(&self) -> anyhow::Result<(InputFiles, GeneratorOptions)> {
        let manifest = match &self.manifest {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    self.config_dir.join(path)
                };
                RunManifest::from_file(&path)
                    .with_context(|| format!("Failed to load run manifest from {path:?}"))?
            }
            None => RunManifest::default(),
        };

        let mut files = InputFiles::default();
        manifest.apply_to(&mut files);
        if let Some(p) = &self.schema {
            files.schema_analysis = p.clone();
        }
        if let Some(p) = &self.plan {
            files.generation_plan = p.clone();
        }
        if let Some(p) = &self.value_lists {
            files.value_lists = p.clone();
        }
        if let Some(p) = &self.generation_rules {
            files.generation_rules = p.clone();
        }
        if let Some(p) = &self.cardinality_rules {
            files.cardinality_rules = Some(p.clone());
        }

        let options = GeneratorOptions {
            seed: self.seed.or(manifest.seed),
            now: self.now,
            policy: if self.strict {
                FallbackPolicy::Strict
            } else {
                FallbackPolicy::Permissive
            },
            enforce_date_consistency: self
                .enforce_date_consistency
                .or(manifest.enforce_date_consistency)
                .unwrap_or(false),
        };

        Ok((files.resolve_against(&self.config_dir), options))
    }
}

/// Run the full pipeline: load, generate, emit.
pub fn run(args: &GenerateArgs) -> anyhow::Result<GenerateReport> {
    let (files, options) = args.resolve()?;
    let generated_at = options.now.unwrap_or_else(|| Local::now().naive_local());

    info!("Loading configuration from {:?}", args.config_dir);
    let mut generator = DataGenerator::from_files(&files, options)
        .context("Failed to load generation configuration")?;
    let GenerationOutput { context, summary } =
        generator.run().context("Data generation failed")?;
    let (nodes, relationships) = context.into_records();

    let config = generator.config();
    let header = ScriptHeader {
        generated_at,
        files: &config.files,
        summary: &summary,
    };
    let emitter = CypherEmitter::new(&config.id_properties)
        .with_batch_size(args.batch_size.unwrap_or(0));
    let stats = emitter
        .write_to_file(
            &args.output,
            &header,
            &nodes,
            &relationships,
        )
        .with_context(|| format!("Failed to write Cypher script to {:?}", args.output))?;

    info!(
        "Wrote {} node units ({} nodes) and {} relationship units ({} relationships)",
        stats.node_units, stats.nodes_written, stats.relationship_units, stats.relationships_written
    );
    info!("Seed: {}", summary.seed);

    Ok(GenerateReport {
        output: args.output.clone(),
        summary,
        stats,
    })
}
