//! File-backed [`ArticleSink`] plus the reader for a previously written
//! `processed.json`.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::contract::ArticleSink;
use crate::error::PipelineError;
use crate::synthesize::Article;
use crate::ticket::ProcessedTicket;

pub const PROCESSED_FILE: &str = "processed.json";
pub const ARTICLES_FILE: &str = "articles.json";

/// Writes pretty JSON into an output directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    output_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write(&self, file_name: &str, value: &impl Serialize) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            error!(error = ?e, dir = %self.output_dir.display(), "Failed to create output directory");
            PipelineError::io(&self.output_dir, e)
        })?;
        let path = self.output_dir.join(file_name);
        write_json_atomic(&path, value)?;
        Ok(path)
    }
}

impl ArticleSink for DirectorySink {
    fn write_processed(&self, tickets: &[ProcessedTicket]) -> Result<PathBuf, PipelineError> {
        let path = self.write(PROCESSED_FILE, &tickets)?;
        info!(tickets = tickets.len(), path = %path.display(), "Wrote processed tickets");
        Ok(path)
    }

    fn write_articles(&self, articles: &[Article]) -> Result<PathBuf, PipelineError> {
        let path = self.write(ARTICLES_FILE, &articles)?;
        info!(articles = articles.len(), path = %path.display(), "Wrote articles");
        Ok(path)
    }
}

/// Serializes `value` as pretty JSON into a temp file next to `path`, then
/// renames it into place.
pub fn write_json_atomic(path: &Path, value: &impl Serialize) -> Result<(), PipelineError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
    serde_json::to_writer_pretty(&mut tmp, value).map_err(|e| PipelineError::json(path, e))?;
    tmp.write_all(b"\n").map_err(|e| PipelineError::io(path, e))?;
    tmp.persist(path).map_err(|e| {
        error!(error = ?e.error, path = %path.display(), "Failed to move output into place");
        PipelineError::io(path, e.error)
    })?;
    Ok(())
}

/// Loads a `processed.json` written by an earlier run.
pub fn read_processed<P: AsRef<Path>>(path: P) -> Result<Vec<ProcessedTicket>, PipelineError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to read processed tickets");
        PipelineError::io(path, e)
    })?;
    let tickets: Vec<ProcessedTicket> =
        serde_json::from_str(&content).map_err(|e| PipelineError::json(path, e))?;
    info!(tickets = tickets.len(), path = %path.display(), "Read processed tickets");
    Ok(tickets)
}
