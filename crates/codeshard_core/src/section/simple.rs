//! Fixed `(offset, length)` byte ranges.

use super::Section;
use crate::error::{CoreResult, WriteResult};
use crate::reader::ByteReader;
use crate::writer::ShardWriter;
use std::io::Write;

/// A contiguous byte range of the shard file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleSection {
    /// File offset of the first byte.
    pub offset: u32,
    /// Length in bytes.
    pub length: u32,
}

impl SimpleSection {
    /// Creates a section covering `[offset, offset + length)`.
    #[must_use]
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// Marks the start of the range at the writer's current offset.
    pub fn start<W: Write>(&mut self, w: &ShardWriter<W>) {
        self.offset = w.offset();
    }

    /// Closes the range at the writer's current offset.
    pub fn end<W: Write>(&mut self, w: &ShardWriter<W>) {
        self.length = w.offset() - self.offset;
    }

    /// Offset one past the last byte.
    ///
    /// Saturates for descriptors read from a corrupt file.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.offset.saturating_add(self.length)
    }

    /// Whether `other` lies entirely within this range.
    #[must_use]
    pub const fn contains(&self, other: SimpleSection) -> bool {
        other.offset >= self.offset && other.limit() <= self.limit()
    }
}

impl Section for SimpleSection {
    const DESCRIPTOR_LEN: u32 = 8;

    fn read(r: &mut ByteReader<'_>) -> CoreResult<Self> {
        let offset = r.u32()?;
        let length = r.u32()?;
        Ok(Self { offset, length })
    }

    fn write<W: Write>(&self, w: &mut ShardWriter<W>) -> WriteResult<()> {
        w.u32(self.offset)?;
        w.u32(self.length)
    }
}
