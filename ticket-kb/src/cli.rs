///
/// This module implements the CLI interface for ticket-kb: command parsing,
/// config loading and user-visible invocations.
///
/// All business logic (enrichment, clustering, article synthesis) lives in the
/// [`ticket-kb-core`] crate. This module only wires files and settings to it.
///
/// ## Commands
/// - `run`: the whole pipeline from a YAML config (extract, process, generate)
/// - `process`: enrich a canonical ticket export into `processed.json`
/// - `generate`: synthesize `articles.json` from a `processed.json`
///
/// ## How To Use
/// - From the shell: the `ticket-kb` binary with `--help`.
/// - From tests: call [`run`] with a constructed [`Cli`].
///
/// [`ticket-kb-core`]: ../../ticket-kb-core/
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticket_kb_core::classify::load_categories;
use ticket_kb_core::contract::TicketSource;
use ticket_kb_core::extract::normalize_fields;
use ticket_kb_core::pipeline::run_pipeline;
use ticket_kb_core::process::process_tickets;
use ticket_kb_core::sink::{read_processed, write_json_atomic, DirectorySink};
use ticket_kb_core::source::JsonFileSource;
use ticket_kb_core::synthesize::{build_articles, SynthesisConfig};

/// CLI for ticket-kb: turn resolved helpdesk tickets into knowledge-base articles.
#[derive(Parser)]
#[clap(
    name = "ticket-kb",
    version,
    about = "Cluster resolved helpdesk tickets and synthesize knowledge-base articles"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run extraction, processing and article generation from a YAML config
    Run {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Enrich an export that already uses canonical field names
    Process {
        /// Path to the YAML config file (process section)
        #[clap(long)]
        config: PathBuf,
        /// JSON export of tickets
        #[clap(long)]
        input: PathBuf,
        /// Where to write the processed tickets
        #[clap(long)]
        output: PathBuf,
    },
    /// Generate articles from a processed tickets file
    Generate {
        /// Processed tickets JSON
        #[clap(long)]
        input: PathBuf,
        /// Where to write the articles
        #[clap(long)]
        output: PathBuf,
        /// Similarity threshold for clustering
        #[clap(long, default_value_t = ticket_kb_core::cluster::DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: f64,
        /// Keywords kept per ticket
        #[clap(long, default_value_t = ticket_kb_core::vectorize::DEFAULT_KEYWORD_COUNT)]
        keywords: usize,
    },
}

/// CLI entrypoint for main() and integration tests.
pub fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Run { config } => {
            let config = load_config(&config)?;
            let pipeline_config = config.pipeline_config()?;
            let categories = load_categories(&config.process.categories_path)
                .context("Failed to load category config")?;
            tracing::info!(command = "run", "Starting ticket pipeline");

            let source = JsonFileSource::new(&pipeline_config.extract.path);
            let sink = DirectorySink::new(&config.output_dir);
            match run_pipeline(&source, &sink, &pipeline_config, &categories) {
                Ok(report) => {
                    tracing::info!(command = "run", ?report, "Pipeline complete");
                    println!(
                        "Pipeline complete: {} processed tickets, {} articles written to {}",
                        report.processed,
                        report.articles,
                        report.articles_path.display()
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "run", error = %e, "Pipeline failed");
                    Err(e.into())
                }
            }
        }
        Commands::Process {
            config,
            input,
            output,
        } => {
            let config = load_config(&config)?;
            let categories = load_categories(&config.process.categories_path)
                .context("Failed to load category config")?;
            tracing::info!(command = "process", input = %input.display(), "Processing tickets");

            let rows = JsonFileSource::new(&input).fetch_rows()?;
            let tickets = normalize_fields(rows, &Default::default())?;
            let processed = process_tickets(tickets, &config.process.settings, &categories);
            write_json_atomic(&output, &processed)?;
            tracing::info!(command = "process", processed = processed.len(), "Processing complete");
            println!("Processed {} tickets into {}", processed.len(), output.display());
            Ok(())
        }
        Commands::Generate {
            input,
            output,
            threshold,
            keywords,
        } => {
            tracing::info!(command = "generate", input = %input.display(), "Generating articles");
            let tickets = read_processed(&input)?;
            let synthesis = SynthesisConfig {
                similarity_threshold: threshold,
                keyword_count: keywords,
            };
            let articles = build_articles(&tickets, &synthesis);
            write_json_atomic(&output, &articles)?;
            tracing::info!(command = "generate", articles = articles.len(), "Generation complete");
            println!("Generated {} articles into {}", articles.len(), output.display());
            Ok(())
        }
    }
}
