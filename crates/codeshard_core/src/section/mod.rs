//! On-disk sections.
//!
//! A section is a byte range of the shard file. Its *descriptor* (where the
//! range lives) is persisted separately from its payload, in the table of
//! contents at the end of the file.
//!
//! Two shapes exist:
//! - [`SimpleSection`]: `offset | length`, 8 bytes
//! - [`CompoundSection`]: a data range of concatenated items plus an index
//!   range of their start offsets, 16 bytes
//!
//! [`ContentSection`] pairs two compound sections, folded content and its
//! case bits.

mod compound;
mod content;
mod simple;

pub use compound::CompoundSection;
pub use content::ContentSection;
pub use simple::SimpleSection;

use crate::error::{CoreResult, WriteResult};
use crate::reader::ByteReader;
use crate::writer::ShardWriter;
use std::io::Write;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::SimpleSection {}
    impl Sealed for super::CompoundSection {}
}

/// A section descriptor that can be persisted and read back.
///
/// Implemented by [`SimpleSection`] and [`CompoundSection`] only; the set of
/// section shapes is fixed by the file format.
pub trait Section: sealed::Sealed + Sized {
    /// Size of the serialized descriptor in bytes.
    const DESCRIPTOR_LEN: u32;

    /// Reads a descriptor.
    ///
    /// # Errors
    ///
    /// Fails if the input is shorter than [`Section::DESCRIPTOR_LEN`].
    fn read(r: &mut ByteReader<'_>) -> CoreResult<Self>;

    /// Writes the descriptor, not the payload it describes.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    fn write<W: Write>(&self, w: &mut ShardWriter<W>) -> WriteResult<()>;
}
