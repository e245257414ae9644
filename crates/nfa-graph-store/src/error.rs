//! Error types for document storage.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while storing, loading or archiving documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (file operations).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Document serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Zip archive error.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A validator rejected the stored contents.
    #[error("validation failed for {}", path.display())]
    ValidationFailed { path: PathBuf },

    /// Archiving was asked for an empty list of files.
    #[error("nothing to archive")]
    EmptyArchive,

    /// A document name or path cannot be used.
    #[error("invalid path: {}", path.display())]
    InvalidPath { path: PathBuf },

    /// A configuration value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}
