//! Delta coding for non-decreasing `u32` sequences.
//!
//! Layout: `varint(count) | varint(delta_0) | ... | varint(delta_{count-1})`,
//! where each delta is relative to the previous absolute value and the first
//! one is relative to zero.

use crate::error::{CodecError, CodecResult};
use crate::varint::{put_uvarint, read_uvarint, read_uvarint_u32};

/// Encode a non-decreasing sequence as a delta blob.
///
/// # Errors
///
/// Returns [`CodecError::NotMonotonic`] if an element is smaller than its
/// predecessor.
pub fn encode_deltas(values: &[u32]) -> CodecResult<Vec<u8>> {
    let mut out = Vec::with_capacity(values.len() * 2 + 1);
    put_uvarint(&mut out, values.len() as u64);

    let mut last = 0u32;
    for (index, &value) in values.iter().enumerate() {
        let delta = value.checked_sub(last).ok_or(CodecError::NotMonotonic {
            index,
            previous: last,
            value,
        })?;
        put_uvarint(&mut out, u64::from(delta));
        last = value;
    }
    Ok(out)
}

/// Decode a delta blob into a fresh vector.
///
/// # Errors
///
/// See [`DeltaDecoder`].
pub fn decode_deltas(data: &[u8]) -> CodecResult<Vec<u32>> {
    let mut values = Vec::new();
    decode_deltas_into(data, &mut values)?;
    Ok(values)
}

/// Decode a delta blob into `values`, reusing its allocation.
///
/// `values` is cleared first. On error its contents are unspecified.
///
/// # Errors
///
/// See [`DeltaDecoder`].
pub fn decode_deltas_into(data: &[u8], values: &mut Vec<u32>) -> CodecResult<()> {
    let mut decoder = DeltaDecoder::new(data)?;
    values.clear();
    values.reserve(decoder.len());
    while let Some(value) = decoder.next_value()? {
        values.push(value);
    }
    decoder.finish()
}

/// Streaming decoder over a delta blob.
///
/// Decoding fails rather than returning a short sequence:
/// - [`CodecError::CountMismatch`] if the blob ends before `count` deltas,
/// - [`CodecError::TrailingBytes`] if bytes remain after them (checked by
///   [`DeltaDecoder::finish`]),
/// - [`CodecError::DeltaOverflow`] if the running total exceeds `u32::MAX`.
#[derive(Debug, Clone)]
pub struct DeltaDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    declared: u64,
    decoded: u64,
    last: u32,
}

impl<'a> DeltaDecoder<'a> {
    /// Read the count header of `data`.
    ///
    /// # Errors
    ///
    /// Fails if the count varint itself is malformed.
    pub fn new(data: &'a [u8]) -> CodecResult<Self> {
        let (declared, pos) = read_uvarint(data)?;
        Ok(Self {
            data,
            pos,
            declared,
            decoded: 0,
            last: 0,
        })
    }

    /// Number of values still to be decoded.
    #[must_use]
    pub fn len(&self) -> usize {
        // Every delta takes at least one byte, so the remaining input bounds
        // what a lying header can make us reserve.
        let remaining = (self.declared - self.decoded) as usize;
        remaining.min(self.data.len() - self.pos)
    }

    /// Whether all declared values have been decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoded == self.declared
    }

    /// Count stored in the blob header.
    #[must_use]
    pub fn declared(&self) -> u64 {
        self.declared
    }

    /// Decode the next absolute value, or `None` after the last one.
    ///
    /// # Errors
    ///
    /// Fails on truncated input or overflow.
    pub fn next_value(&mut self) -> CodecResult<Option<u32>> {
        if self.decoded == self.declared {
            return Ok(None);
        }
        let (delta, consumed) = match read_uvarint_u32(&self.data[self.pos..]) {
            Ok(decoded) => decoded,
            Err(CodecError::UnexpectedEof) if self.pos == self.data.len() => {
                return Err(CodecError::CountMismatch {
                    declared: self.declared,
                    decoded: self.decoded,
                });
            }
            Err(e) => return Err(e),
        };
        let value = self
            .last
            .checked_add(delta)
            .ok_or(CodecError::DeltaOverflow)?;
        self.pos += consumed;
        self.decoded += 1;
        self.last = value;
        Ok(Some(value))
    }

    /// Check that every declared value was consumed and nothing follows.
    ///
    /// # Errors
    ///
    /// [`CodecError::CountMismatch`] or [`CodecError::TrailingBytes`].
    pub fn finish(self) -> CodecResult<()> {
        if self.decoded != self.declared {
            return Err(CodecError::CountMismatch {
                declared: self.declared,
                decoded: self.decoded,
            });
        }
        let remaining = self.data.len() - self.pos;
        if remaining > 0 {
            return Err(CodecError::TrailingBytes { remaining });
        }
        Ok(())
    }
}
