//! Sequential shard writer.

use crate::error::{WriteError, WriteResult};
use codeshard_codec::{put_uvarint, MAX_VARINT_LEN};
use std::io::{self, Write};

/// Appends bytes to an output stream and tracks the write offset.
///
/// The first failure poisons the writer: that call and every later one
/// return a clone of the same [`WriteError`] without touching the stream
/// again. Callers may propagate each result with `?`, or issue a run of
/// writes and inspect [`ShardWriter::status`] once at the end.
///
/// Offsets are 32-bit; writing past `u32::MAX` bytes fails.
#[derive(Debug)]
pub struct ShardWriter<W> {
    inner: W,
    offset: u32,
    failure: Option<WriteError>,
}

impl<W: Write> ShardWriter<W> {
    /// Wraps `inner`, starting at offset zero.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            offset: 0,
            failure: None,
        }
    }

    /// Number of bytes successfully written so far.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// `Ok` unless an earlier write failed.
    ///
    /// # Errors
    ///
    /// Returns the stored failure.
    pub fn status(&self) -> WriteResult<()> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    /// Writes all of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns the stored failure if the writer is poisoned, otherwise the
    /// error of the underlying stream (which then poisons the writer).
    pub fn write(&mut self, mut bytes: &[u8]) -> WriteResult<()> {
        self.status()?;

        while !bytes.is_empty() {
            match self.inner.write(bytes) {
                Ok(0) => {
                    return Err(self.poison(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole buffer",
                    )))
                }
                Ok(n) => {
                    self.advance(n)?;
                    bytes = &bytes[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.poison(e)),
            }
        }
        Ok(())
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// See [`ShardWriter::write`].
    pub fn byte(&mut self, b: u8) -> WriteResult<()> {
        self.write(&[b])
    }

    /// Writes `n` as four big-endian bytes.
    ///
    /// # Errors
    ///
    /// See [`ShardWriter::write`].
    pub fn u32(&mut self, n: u32) -> WriteResult<()> {
        self.write(&n.to_be_bytes())
    }

    /// Writes `n` as eight big-endian bytes.
    ///
    /// # Errors
    ///
    /// See [`ShardWriter::write`].
    pub fn u64(&mut self, n: u64) -> WriteResult<()> {
        self.write(&n.to_be_bytes())
    }

    /// Writes `n` as an unsigned varint.
    ///
    /// # Errors
    ///
    /// See [`ShardWriter::write`].
    pub fn varint(&mut self, n: u64) -> WriteResult<()> {
        let mut enc = [0u8; MAX_VARINT_LEN];
        let mut buf = &mut enc[..];
        put_uvarint(&mut buf, n);
        let len = MAX_VARINT_LEN - buf.len();
        self.write(&enc[..len])
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// See [`ShardWriter::write`].
    pub fn flush(&mut self) -> WriteResult<()> {
        self.status()?;
        self.inner.flush().map_err(|e| self.poison(e))
    }

    /// The underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns the underlying stream if no write failed.
    ///
    /// # Errors
    ///
    /// Returns the stored failure.
    pub fn into_inner(self) -> WriteResult<W> {
        self.status()?;
        Ok(self.inner)
    }

    fn advance(&mut self, n: usize) -> WriteResult<()> {
        let next = u32::try_from(n)
            .ok()
            .and_then(|n| self.offset.checked_add(n));
        match next {
            Some(offset) => {
                self.offset = offset;
                Ok(())
            }
            None => Err(self.poison(io::Error::other(
                "shard exceeds the 4 GiB addressable by 32-bit offsets",
            ))),
        }
    }

    fn poison(&mut self, error: io::Error) -> WriteError {
        let failure = WriteError::new(self.offset, error);
        tracing::debug!(offset = self.offset, error = %failure, "shard writer poisoned");
        self.failure = Some(failure.clone());
        failure
    }
}
