//! Error types for sweepclean.

use thiserror::Error;

/// The main error type for sweepclean operations.
#[derive(Error, Debug)]
pub enum SweepcleanError {
    /// A dataset handle does not refer to a live dataset.
    #[error("dataset handle {0} is not live")]
    StaleHandle(String),

    /// A dataset with the given name already exists in the arena.
    #[error("dataset '{0}' already exists")]
    DatasetExists(String),

    /// Custom bounds were rejected.
    #[error("invalid bounds: min {min} is not below max {max}")]
    InvalidBounds { min: String, max: String },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A CSV file did not start with the expected header.
    #[error("unexpected CSV header '{found}', expected '{expected}'")]
    CsvHeader { expected: String, found: String },

    /// A CSV row could not be interpreted.
    #[error("malformed CSV row {row}: {reason}")]
    CsvRow { row: usize, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for sweepclean operations.
pub type Result<T> = std::result::Result<T, SweepcleanError>;
