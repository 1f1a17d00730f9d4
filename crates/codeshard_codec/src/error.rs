//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during varint or delta coding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended in the middle of a varint.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A varint did not terminate within 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A decoded value does not fit the requested integer width.
    #[error("value {value} out of range for u32")]
    ValueOutOfRange {
        /// The decoded value.
        value: u64,
    },

    /// The declared element count disagrees with the deltas present.
    #[error("delta blob declares {declared} values but holds {decoded}")]
    CountMismatch {
        /// Count stored at the head of the blob.
        declared: u64,
        /// Number of deltas that could be decoded.
        decoded: u64,
    },

    /// Bytes remain after the declared number of deltas.
    #[error("{remaining} trailing bytes after delta sequence")]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },

    /// Input to the delta encoder decreased.
    #[error("sequence not monotonic at index {index}: {value} < {previous}")]
    NotMonotonic {
        /// Position of the offending element.
        index: usize,
        /// The preceding element.
        previous: u32,
        /// The offending element.
        value: u32,
    },

    /// Accumulated deltas exceed `u32::MAX`.
    #[error("delta sum overflows u32")]
    DeltaOverflow,
}
