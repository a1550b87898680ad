//! Error types for the scsplit library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid count value '{value}' at row {row}, column {col}")]
    InvalidCount {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Duplicate identifier '{0}'")]
    DuplicateId(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Missing column {index} (table has {n_columns} columns)")]
    MissingColumn { index: usize, n_columns: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Integrity check failed: {0}")]
    Integrity(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SplitError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// True for failures of the explicit sanity checks.
    pub fn is_integrity(&self) -> bool {
        matches!(self, SplitError::Integrity(_))
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, SplitError>;
