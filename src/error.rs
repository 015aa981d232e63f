// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No valid selection: latitude and longitude both use column '{0}'")]
    IdenticalColumns(String),

    #[error("Column '{column}' not found (available: {})", .available.join(", "))]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Cluster count {requested} outside allowed range [{min}, {max}]")]
    InvalidClusterCount { requested: usize, min: usize, max: usize },

    #[error("No valid data: none of the {total_rows} rows has numeric latitude and longitude")]
    NoValidData { total_rows: usize },

    #[error("Only {points} valid points, cannot form {clusters} clusters")]
    InsufficientPoints { points: usize, clusters: usize },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// True for problems the user fixes by changing input or selection,
    /// as opposed to I/O or configuration failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PipelineError::IdenticalColumns(_)
                | PipelineError::UnknownColumn { .. }
                | PipelineError::InvalidClusterCount { .. }
                | PipelineError::NoValidData { .. }
                | PipelineError::InsufficientPoints { .. }
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}
