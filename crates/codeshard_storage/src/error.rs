//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to read beyond the end of the file.
    #[error("read beyond end of {name}: offset {offset}, len {len}, size {size}")]
    ReadPastEnd {
        /// Name of the index file.
        name: String,
        /// The requested read offset.
        offset: u32,
        /// The requested read length.
        len: u32,
        /// The file size.
        size: u32,
    },

    /// The file cannot be addressed with 32-bit offsets.
    #[error("index file too large: {size} bytes")]
    TooLarge {
        /// The file size in bytes.
        size: u64,
    },

    /// Renaming a finished shard into place failed.
    #[error("failed to publish {path}: {source}")]
    Persist {
        /// Destination path.
        path: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}
