use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] handover_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Handover ID cannot be empty")]
    EmptyHandoverId,
    #[error("Invalid payload in {path}: {message}")]
    InvalidPayload { path: String, message: String },
}
