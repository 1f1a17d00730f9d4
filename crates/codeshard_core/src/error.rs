//! Error types for codeshard core.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for [`crate::ShardWriter`] operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// The first failure of a [`crate::ShardWriter`].
///
/// Cloning shares the underlying `io::Error`, so a poisoned writer returns
/// the very same failure from every later call.
#[derive(Debug, Clone, Error)]
#[error("write failed at offset {offset}: {source}")]
pub struct WriteError {
    offset: u32,
    #[source]
    source: Arc<io::Error>,
}

impl WriteError {
    pub(crate) fn new(offset: u32, source: io::Error) -> Self {
        Self {
            offset,
            source: Arc::new(source),
        }
    }

    /// Offset of the writer when the failure happened.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Whether `self` and `other` are clones of one failure.
    #[must_use]
    pub fn same_failure(&self, other: &WriteError) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

/// Errors that can occur in codeshard core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] codeshard_storage::StorageError),

    /// Varint or delta codec error.
    #[error("codec error: {0}")]
    Codec(#[from] codeshard_codec::CodecError),

    /// The shard writer failed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// I/O error outside the shard writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A fixed-width read ran out of input.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required by the read.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// An item index beyond the number of stored items.
    #[error("item {index} out of range for section with {count} items")]
    ItemOutOfRange {
        /// The requested item.
        index: usize,
        /// Number of items in the section.
        count: usize,
    },

    /// Decoded item offsets point outside the section's data region.
    #[error("item {index} spans [{start}, {end}) outside data region [{data_start}, {data_end})")]
    BlobOutsideData {
        /// The requested item.
        index: usize,
        /// Decoded start offset.
        start: u32,
        /// Decoded end offset.
        end: u32,
        /// Start of the data region.
        data_start: u32,
        /// End of the data region.
        data_end: u32,
    },

    /// An offset table whose length is not a multiple of four.
    #[error("index section length {length} is not a multiple of 4")]
    MisalignedIndex {
        /// Section length in bytes.
        length: u32,
    },

    /// The content and case-bit sections disagree on the item count.
    #[error("content section has {content} items but case bits have {case_bits}")]
    ItemCountMismatch {
        /// Items in the content section.
        content: usize,
        /// Items in the case-bits section.
        case_bits: usize,
    },

    /// Invalid shard layout or version.
    #[error("invalid shard format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// A document was rejected by the builder.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Why the document was rejected.
        message: String,
    },

    /// More distinct branch names than a shard can record.
    #[error("too many branches: a shard holds at most {limit}")]
    TooManyBranches {
        /// The configured limit.
        limit: usize,
    },
}

impl CoreError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
