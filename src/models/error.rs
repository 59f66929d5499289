use std::path::PathBuf;
use thiserror::Error;

/// Error types for archive compression and extraction
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The archive implementation does not provide this operation.
    #[error("Unsupported archive operation: {0}")]
    Unsupported(&'static str),

    #[error("Source does not exist: {0}")]
    MissingSource(PathBuf),

    #[error("Invalid source provided: {0}")]
    InvalidSource(String),

    #[error("Could not open archive: {0}")]
    Open(String),

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Failed to write archive entry: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
