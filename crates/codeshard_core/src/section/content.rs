//! Case-folded text with its case bits.

use super::{CompoundSection, Section};
use crate::case::SearchableString;
use crate::error::{CoreError, CoreResult, WriteResult};
use crate::index_data::IndexData;
use crate::reader::ByteReader;
use crate::writer::ShardWriter;
use std::io::Write;

/// Two parallel compound sections: folded content and case bits.
///
/// Item `i` of both sections belongs to the same string. The descriptor
/// order, `content` then `case_bits`, is part of the file format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentSection {
    /// Case-folded bytes of every string.
    pub content: CompoundSection,
    /// Case bits of every string.
    pub case_bits: CompoundSection,
}

impl ContentSection {
    /// Size of the two serialized descriptors.
    pub const DESCRIPTOR_LEN: u32 = 2 * CompoundSection::DESCRIPTOR_LEN;

    /// Creates an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes all folded content, then all case bits.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_strings<W: Write>(
        &mut self,
        w: &mut ShardWriter<W>,
        strings: &[SearchableString],
    ) -> WriteResult<()> {
        self.content.start(w);
        for s in strings {
            self.content.add_item(w, &s.data)?;
        }
        self.content.end(w)?;

        self.case_bits.start(w);
        for s in strings {
            self.case_bits.add_item(w, &s.case_bits)?;
        }
        self.case_bits.end(w)
    }

    /// Reads both descriptors.
    ///
    /// # Errors
    ///
    /// Fails on truncated input.
    pub fn read(r: &mut ByteReader<'_>) -> CoreResult<Self> {
        let content = CompoundSection::read(r)?;
        let case_bits = CompoundSection::read(r)?;
        Ok(Self { content, case_bits })
    }

    /// Writes both descriptors.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write<W: Write>(&self, w: &mut ShardWriter<W>) -> WriteResult<()> {
        self.content.write(w)?;
        self.case_bits.write(w)
    }

    /// Loads both offset tables.
    ///
    /// # Errors
    ///
    /// Fails if either table cannot be read, or with
    /// [`CoreError::ItemCountMismatch`] if they differ in length.
    pub fn read_index(&mut self, data: &IndexData) -> CoreResult<()> {
        self.content.read_index(data)?;
        self.case_bits.read_index(data)?;

        let (content, case_bits) = (self.content.item_count(), self.case_bits.item_count());
        if content != case_bits {
            return Err(CoreError::ItemCountMismatch { content, case_bits });
        }
        Ok(())
    }

    /// Number of strings.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.content.item_count()
    }

    /// Reads string `i` in folded form.
    ///
    /// # Errors
    ///
    /// Fails if `i` is out of range or the file cannot be read.
    pub fn read_string(&self, data: &IndexData, i: usize) -> CoreResult<SearchableString> {
        Ok(SearchableString {
            data: self.content.read_blob(data, i)?,
            case_bits: self.case_bits.read_blob(data, i)?,
        })
    }

    /// Reads string `i` with its original casing.
    ///
    /// # Errors
    ///
    /// As [`ContentSection::read_string`], plus an error if the case bits are
    /// too short for the content.
    pub fn read_original(&self, data: &IndexData, i: usize) -> CoreResult<Vec<u8>> {
        self.read_string(data, i)?.to_original()
    }
}
