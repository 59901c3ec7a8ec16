//! Error types for the data-loader crate.
//!
//! Every failure here means the model artifacts on disk are missing or
//! corrupt. The service cannot become ready until they are fixed, so none of
//! these are recovered from inside the crate.

use thiserror::Error;

/// Errors that can occur while loading the model artifacts
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Artifact file does not exist
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in an artifact file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A feature row does not have the same width as the first row
    #[error("Expected {expected} features but found {found} in line {line}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// Artifacts parsed but are inconsistent with each other
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
