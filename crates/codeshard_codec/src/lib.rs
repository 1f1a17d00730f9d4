//! # Codeshard Codec
//!
//! Integer coding used by the codeshard index format.
//!
//! - [`varint`]: unsigned LEB128 varints (7 payload bits per byte, low group
//!   first, high bit as continuation flag)
//! - [`delta`]: count-prefixed delta coding of non-decreasing `u32`
//!   sequences, used for offset tables such as per-document newline positions
//!
//! Decoders never return a silently truncated result: a blob that ends early,
//! carries extra bytes, or overflows `u32` is an error.
//!
//! ## Usage
//!
//! ```
//! use codeshard_codec::{decode_deltas, encode_deltas};
//!
//! let offsets = [0, 3, 3, 6];
//! let blob = encode_deltas(&offsets).unwrap();
//! assert_eq!(blob, [4, 0, 3, 0, 3]);
//! assert_eq!(decode_deltas(&blob).unwrap(), offsets);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod delta;
mod error;
pub mod varint;

pub use delta::{decode_deltas, decode_deltas_into, encode_deltas, DeltaDecoder};
pub use error::{CodecError, CodecResult};
pub use varint::{put_uvarint, read_uvarint, read_uvarint_u32, uvarint_len, MAX_VARINT_LEN};
