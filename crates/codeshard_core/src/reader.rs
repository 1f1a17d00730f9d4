//! Cursor over an in-memory byte range.

use crate::error::{CoreError, CoreResult};
use codeshard_codec::read_uvarint;

/// Reads fixed-width and variable-width integers from a byte slice.
///
/// Used to parse descriptor tables and other small blobs fetched from an
/// [`codeshard_storage::IndexFile`].
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position within the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unread bytes.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Whether all input has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads `len` raw bytes.
    ///
    /// # Errors
    ///
    /// [`CoreError::Truncated`] if fewer than `len` bytes remain.
    pub fn bytes(&mut self, len: usize) -> CoreResult<&'a [u8]> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(CoreError::Truncated {
                needed: len,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a big-endian `u32`.
    ///
    /// # Errors
    ///
    /// [`CoreError::Truncated`] if fewer than four bytes remain.
    pub fn u32(&mut self) -> CoreResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a big-endian `u64`.
    ///
    /// # Errors
    ///
    /// [`CoreError::Truncated`] if fewer than eight bytes remain.
    pub fn u64(&mut self) -> CoreResult<u64> {
        let b = self.bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }

    /// Reads an unsigned varint.
    ///
    /// # Errors
    ///
    /// Fails if the varint is truncated or overflows 64 bits.
    pub fn varint(&mut self) -> CoreResult<u64> {
        let (value, consumed) = read_uvarint(self.remaining())?;
        self.pos += consumed;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeshard_codec::CodecError;

    #[test]
    fn reads_big_endian_u32_in_sequence() {
        let mut r = ByteReader::new(&[0, 0, 0, 100, 0, 0, 0, 20]);
        assert_eq!(r.u32().unwrap(), 100);
        assert_eq!(r.u32().unwrap(), 20);
        assert!(r.is_empty());
    }

    #[test]
    fn short_u32_is_truncated() {
        let mut r = ByteReader::new(&[0, 0, 1]);
        assert!(matches!(
            r.u32(),
            Err(CoreError::Truncated {
                needed: 4,
                available: 3
            })
        ));
        // A failed read consumes nothing.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn reads_varints() {
        let mut r = ByteReader::new(&[0xac, 0x02, 0x05]);
        assert_eq!(r.varint().unwrap(), 300);
        assert_eq!(r.varint().unwrap(), 5);
        assert!(matches!(
            r.varint(),
            Err(CoreError::Codec(CodecError::UnexpectedEof))
        ));
    }

    #[test]
    fn reads_u64_and_raw_bytes() {
        let mut r = ByteReader::new(&[0, 0, 0, 0, 0, 0, 1, 0, b'h', b'i']);
        assert_eq!(r.u64().unwrap(), 256);
        assert_eq!(r.bytes(2).unwrap(), b"hi");
        assert!(r.remaining().is_empty());
    }
}
