//! File-backed [`TicketSource`].

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::contract::TicketSource;
use crate::error::PipelineError;
use crate::ticket::RawRow;

/// Reads a JSON array of objects, one object per ticket.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TicketSource for JsonFileSource {
    fn fetch_rows(&self) -> Result<Vec<RawRow>, PipelineError> {
        info!(path = %self.path.display(), "Reading ticket export");
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            error!(error = ?e, path = %self.path.display(), "Failed to read ticket export");
            PipelineError::io(&self.path, e)
        })?;
        let rows: Vec<RawRow> = serde_json::from_str(&content).map_err(|e| {
            error!(error = ?e, path = %self.path.display(), "Ticket export is not a JSON array of objects");
            PipelineError::json(&self.path, e)
        })?;
        info!(rows = rows.len(), "Read ticket export");
        Ok(rows)
    }
}
