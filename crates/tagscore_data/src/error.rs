//! Error types for tagscore_data.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or writing evaluation data.
#[derive(Error, Debug)]
pub enum DataError {
    /// Path does not exist.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File extension is not a supported format.
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Directory contains no dataset files.
    #[error("Dataset is empty: no JSON files in {}", .0.display())]
    EmptyDataset(PathBuf),

    /// File format error.
    #[error("File format error: {0}")]
    FormatError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    CoreError(#[from] tagscore_core::CoreError),
}
