//! Unsigned LEB128 varints.
//!
//! Each byte carries 7 payload bits, least significant group first. The high
//! bit is set on every byte except the last. A `u64` needs at most
//! [`MAX_VARINT_LEN`] bytes.

use bytes::BufMut;

use crate::error::{CodecError, CodecResult};

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` to `buf` as a varint.
pub fn put_uvarint(buf: &mut impl BufMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes [`put_uvarint`] emits for `value`.
#[must_use]
pub fn uvarint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Decode a varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// [`CodecError::UnexpectedEof`] if `data` ends before the terminating byte,
/// [`CodecError::VarintOverflow`] if the value does not fit in 64 bits.
pub fn read_uvarint(data: &[u8]) -> CodecResult<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for (i, &byte) in data.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(CodecError::VarintOverflow);
        }
        if byte < 0x80 {
            // The tenth byte may only contribute the single remaining bit.
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(CodecError::VarintOverflow);
            }
            return Ok((value | u64::from(byte) << shift, i + 1));
        }
        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }

    if data.len() >= MAX_VARINT_LEN {
        return Err(CodecError::VarintOverflow);
    }
    Err(CodecError::UnexpectedEof)
}

/// Decode a varint that must fit in a `u32`.
///
/// # Errors
///
/// As [`read_uvarint`], plus [`CodecError::ValueOutOfRange`] for values above
/// `u32::MAX`.
pub fn read_uvarint_u32(data: &[u8]) -> CodecResult<(u32, usize)> {
    let (value, consumed) = read_uvarint(data)?;
    let value = u32::try_from(value).map_err(|_| CodecError::ValueOutOfRange { value })?;
    Ok((value, consumed))
}
