//! HGNC Ingest - code system generator

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hgnc_common::logging::{init_logging, LogConfig, LogLevel};
use hgnc_ingest::codesystem::JsonFileSink;
use hgnc_ingest::hgnc::{GeneratorConfig, GeneratorPipeline, GroupPropertyMode, PipelineInputs};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "hgnc-ingest")]
#[command(author, version, about = "Generate code systems from the HGNC downloads")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the gene groups and gene ids code systems
    Generate {
        /// HGNC complete set (hgnc_complete_set.json)
        #[arg(long)]
        genes: PathBuf,

        /// Gene group download (download-all.json)
        #[arg(long)]
        groups: PathBuf,

        /// Gene group closure table (CSV of parent,child,distance)
        #[arg(long)]
        closure: Option<PathBuf>,

        /// Output file for the gene ids code system
        #[arg(long)]
        genes_out: PathBuf,

        /// Output file for the gene groups code system
        #[arg(long)]
        groups_out: PathBuf,

        /// How gene group membership is written on gene concepts
        #[arg(long)]
        group_property: Option<GroupPropertyMode>,

        /// The closure table starts with a header row
        #[arg(long)]
        closure_header: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate only the gene ids code system
    Genes {
        /// HGNC complete set (hgnc_complete_set.json)
        #[arg(long)]
        genes: PathBuf,

        /// Output file for the gene ids code system
        #[arg(short, long)]
        out: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write JSON without indentation
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("hgnc-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let mut config = GeneratorConfig::from_env().context("Failed to load generator configuration")?;

    let (inputs, mut sink) = match cli.command {
        Command::Generate {
            genes,
            groups,
            closure,
            genes_out,
            groups_out,
            group_property,
            closure_header,
            output,
        } => {
            if let Some(mode) = group_property {
                config = config.with_group_property(mode);
            }
            if closure_header {
                config = config.with_closure_header(true);
            }
            if output.compact {
                config = config.with_pretty_output(false);
            }

            let mut inputs = PipelineInputs::genes_only(genes).with_groups(groups);
            if let Some(closure) = closure {
                inputs = inputs.with_closure(closure);
            }

            let sink = JsonFileSink::new()
                .with_gene_ids(genes_out)
                .with_gene_groups(groups_out)
                .pretty(config.pretty_output);

            (inputs, sink)
        },
        Command::Genes { genes, out, output } => {
            if output.compact {
                config = config.with_pretty_output(false);
            }

            let sink = JsonFileSink::new()
                .with_gene_ids(out)
                .pretty(config.pretty_output);

            (PipelineInputs::genes_only(genes), sink)
        },
    };

    info!("Generating HGNC code systems");

    let pipeline = GeneratorPipeline::new(config);
    let result = pipeline
        .run_into(&inputs, &mut sink)
        .context("HGNC code system generation failed")?;

    if !result.diagnostics.is_empty() {
        warn!(
            count = result.diagnostics.len(),
            dangling_parents = result.stats.dangling_parents,
            unknown_genes = result.stats.unknown_genes,
            "Generation finished with dropped references"
        );
    }

    info!(version = %result.stats.version, "Ingestion complete");
    Ok(())
}
