//! Report output errors.
//!
//! Scoring itself never fails; only reading and writing tables can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV parse error at line {line}: {source}")]
    CsvRecord {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for report reading and writing.
pub type ReportResult<T> = Result<T, ReportError>;
