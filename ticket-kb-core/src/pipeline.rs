//! High-level pipeline: extract → process → synthesize, with both results
//! handed to an [`ArticleSink`].
//!
//! # Responsibilities
//! - Fail-fast orchestration: the first failing step ends the run with its error
//! - Logs every step with counts for traceability
//! - Never reads config files itself; all settings arrive in [`PipelineConfig`]
//!
//! # Callable From
//! - The CLI crate and the integration tests, with real or mocked seams
//!
//! # Navigation
//! - Main entrypoint: [`run_pipeline`]
//! - Supporting types: [`PipelineConfig`], [`PipelineReport`]

use std::path::PathBuf;

use tracing::{error, info};

use crate::classify::CategoryConfig;
use crate::contract::{ArticleSink, TicketSource};
use crate::error::PipelineError;
use crate::extract::{filter_quality, filter_resolved, normalize_fields, ExtractConfig};
use crate::process::{process_tickets, ProcessConfig};
use crate::synthesize::{build_articles, SynthesisConfig};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub extract: ExtractConfig,
    pub process: ProcessConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Tickets left after extraction filters.
    pub extracted: usize,
    pub processed: usize,
    pub articles: usize,
    pub processed_path: PathBuf,
    pub articles_path: PathBuf,
}

pub fn run_pipeline<S, K>(
    source: &S,
    sink: &K,
    config: &PipelineConfig,
    categories: &CategoryConfig,
) -> Result<PipelineReport, PipelineError>
where
    S: TicketSource + ?Sized,
    K: ArticleSink + ?Sized,
{
    info!("[PIPELINE] Starting ticket pipeline");

    // --- Step 1: Extract ---
    let rows = source.fetch_rows().map_err(|e| {
        error!(error = %e, "[PIPELINE][ERROR] Fetching tickets failed");
        e
    })?;
    info!(rows = rows.len(), "[PIPELINE] Fetched export rows");

    let tickets = normalize_fields(rows, &config.extract.fields).map_err(|e| {
        error!(error = %e, "[PIPELINE][ERROR] Normalizing fields failed");
        e
    })?;
    let tickets = filter_resolved(tickets, &config.extract.resolved_status_values);
    let tickets = filter_quality(tickets, config.extract.min_resolution_length);
    let extracted = tickets.len();
    info!(extracted, "[PIPELINE] Extraction complete");

    // --- Step 2: Process ---
    let processed = process_tickets(tickets, &config.process, categories);
    let processed_path = sink.write_processed(&processed).map_err(|e| {
        error!(error = %e, "[PIPELINE][ERROR] Writing processed tickets failed");
        e
    })?;
    info!(processed = processed.len(), path = %processed_path.display(), "[PIPELINE] Processing complete");

    // --- Step 3: Synthesize ---
    let articles = build_articles(&processed, &config.synthesis);
    let articles_path = sink.write_articles(&articles).map_err(|e| {
        error!(error = %e, "[PIPELINE][ERROR] Writing articles failed");
        e
    })?;
    info!(articles = articles.len(), path = %articles_path.display(), "[PIPELINE] Synthesis complete");

    Ok(PipelineReport {
        extracted,
        processed: processed.len(),
        articles: articles.len(),
        processed_path,
        articles_path,
    })
}
