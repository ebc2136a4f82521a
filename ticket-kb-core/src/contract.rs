//! # contract: the I/O seams of the pipeline
//!
//! The pipeline reads tickets through a [`TicketSource`] and writes its
//! results through an [`ArticleSink`]. Both are plain synchronous traits.
//!
//! ## Implementations
//! - [`crate::source::JsonFileSource`] reads a JSON export from disk.
//! - [`crate::sink::DirectorySink`] writes `processed.json` and `articles.json`.
//!
//! ## Mocking & Testing
//! - Both traits carry `mockall::automock` (under `cfg(test)` or the default
//!   `test-export-mocks` feature), so integration tests can use
//!   `MockTicketSource` and `MockArticleSink`.
//!
//! ## Adding a source or destination
//! - Implement the trait and convert every upstream failure into a
//!   [`PipelineError`] (`Source` or `Sink` when nothing more specific fits).

use std::path::PathBuf;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::PipelineError;
use crate::synthesize::Article;
use crate::ticket::{ProcessedTicket, RawRow};

/// Supplies the raw export rows for one run.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait TicketSource {
    /// All rows of the export, keyed by the export's own column names.
    fn fetch_rows(&self) -> Result<Vec<RawRow>, PipelineError>;
}

/// Receives the enriched tickets and the synthesized articles.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ArticleSink {
    /// Persists the enriched ticket table, returning where it went.
    fn write_processed(&self, tickets: &[ProcessedTicket]) -> Result<PathBuf, PipelineError>;

    /// Persists the articles, returning where they went.
    fn write_articles(&self, articles: &[Article]) -> Result<PathBuf, PipelineError>;
}
