//! Error types for homelog-store.

use std::path::PathBuf;

/// Result type for homelog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in homelog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An insert failed; the record was not written.
    #[error("write failed: {0}")]
    WriteFailed(#[source] rusqlite::Error),

    /// A query failed; no partial results are returned.
    #[error("read failed: {0}")]
    ReadFailed(#[source] rusqlite::Error),

    /// Database open or schema initialization error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create the database directory.
    #[error("failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}
