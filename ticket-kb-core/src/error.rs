use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the ticket pipeline. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<String>),

    #[error("invalid ticket row {index}: {source}")]
    InvalidRow {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("ticket source failed: {0}")]
    Source(String),

    #[error("article sink failed: {0}")]
    Sink(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        PipelineError::Json {
            path: path.into(),
            source,
        }
    }
}
