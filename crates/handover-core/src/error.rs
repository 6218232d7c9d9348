//! Error types for handover-core

use thiserror::Error;

use crate::convert::ParseError;
use crate::validation::ValidationError;

/// Result type alias using handover-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in handover-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Handover not found
    #[error("Handover not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload rejected by validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed CSV input
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
