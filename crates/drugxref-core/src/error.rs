use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Unknown record kind: {0}")]
    UnknownKind(String),

    #[error("Unrepairable JSON in {}: {message} (failure offset {offset})", .path.display())]
    DecodeRepair {
        path: PathBuf,
        offset: usize,
        message: String,
    },

    #[error("No journals to rank")]
    EmptyInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
