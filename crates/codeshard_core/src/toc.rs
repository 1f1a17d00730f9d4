//! Table of contents of a shard file.
//!
//! ```text
//! +------------------------------+
//! | section payloads             |  in Toc field order
//! +------------------------------+
//! | u32 descriptor count         |
//! | descriptors                  |  the TOC itself
//! +------------------------------+
//! | TOC offset | TOC length      |  last 8 bytes of the file
//! +------------------------------+
//! ```

use crate::error::{CoreError, CoreResult, WriteResult};
use crate::index_data::IndexData;
use crate::reader::ByteReader;
use crate::section::{CompoundSection, ContentSection, Section, SimpleSection};
use crate::writer::ShardWriter;
use std::io::Write;

/// Version written into the metadata section.
pub const FORMAT_VERSION: u32 = 1;

/// Number of descriptors in the TOC.
///
/// A content section contributes two compound descriptors.
pub const TOC_DESCRIPTOR_COUNT: u32 = 10;

/// Length of the trailing TOC descriptor.
pub const TRAILER_LEN: u32 = SimpleSection::DESCRIPTOR_LEN;

/// Descriptors of every section in a shard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toc {
    /// Document contents, case-folded, with case bits.
    pub contents: ContentSection,
    /// Document paths, case-folded, with case bits.
    pub names: ContentSection,
    /// Per document, the delta-coded offsets of its newline bytes.
    pub newlines: CompoundSection,
    /// Per document, a big-endian `u64` mask over `branch_names`.
    pub branch_masks: SimpleSection,
    /// Branch names; item `b` is bit `b` of a branch mask.
    pub branch_names: CompoundSection,
    /// Sub-repository paths; item 0 is the root repository (`""`).
    pub sub_repos: CompoundSection,
    /// Per document, a varint index into `sub_repos`.
    pub sub_repo_indices: SimpleSection,
    /// Format version and document count.
    pub metadata: SimpleSection,
}

impl Toc {
    /// Serialized length: the count word plus all descriptors.
    pub const ENCODED_LEN: u32 = 4
        + 2 * ContentSection::DESCRIPTOR_LEN
        + 3 * CompoundSection::DESCRIPTOR_LEN
        + 3 * SimpleSection::DESCRIPTOR_LEN;

    /// Writes the descriptor count and every descriptor.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write<W: Write>(&self, w: &mut ShardWriter<W>) -> WriteResult<()> {
        w.u32(TOC_DESCRIPTOR_COUNT)?;
        self.contents.write(w)?;
        self.names.write(w)?;
        self.newlines.write(w)?;
        self.branch_masks.write(w)?;
        self.branch_names.write(w)?;
        self.sub_repos.write(w)?;
        self.sub_repo_indices.write(w)?;
        self.metadata.write(w)
    }

    /// Reads a TOC written by [`Toc::write`].
    ///
    /// # Errors
    ///
    /// Fails on truncated input or an unexpected descriptor count.
    pub fn read(r: &mut ByteReader<'_>) -> CoreResult<Self> {
        let count = r.u32()?;
        if count != TOC_DESCRIPTOR_COUNT {
            return Err(CoreError::invalid_format(format!(
                "TOC lists {count} sections, expected {TOC_DESCRIPTOR_COUNT}"
            )));
        }
        Ok(Self {
            contents: ContentSection::read(r)?,
            names: ContentSection::read(r)?,
            newlines: CompoundSection::read(r)?,
            branch_masks: SimpleSection::read(r)?,
            branch_names: CompoundSection::read(r)?,
            sub_repos: CompoundSection::read(r)?,
            sub_repo_indices: SimpleSection::read(r)?,
            metadata: SimpleSection::read(r)?,
        })
    }

    /// Loads the offset tables of every compound section.
    ///
    /// # Errors
    ///
    /// Fails if a table cannot be read.
    pub fn read_index(&mut self, data: &IndexData) -> CoreResult<()> {
        self.contents.read_index(data)?;
        self.names.read_index(data)?;
        self.newlines.read_index(data)?;
        self.branch_names.read_index(data)?;
        self.sub_repos.read_index(data)
    }

    /// One entry per descriptor, in file order.
    #[must_use]
    pub fn entries(&self) -> Vec<TocEntry> {
        vec![
            TocEntry::compound("contents.content", &self.contents.content),
            TocEntry::compound("contents.case_bits", &self.contents.case_bits),
            TocEntry::compound("names.content", &self.names.content),
            TocEntry::compound("names.case_bits", &self.names.case_bits),
            TocEntry::compound("newlines", &self.newlines),
            TocEntry::simple("branch_masks", self.branch_masks),
            TocEntry::compound("branch_names", &self.branch_names),
            TocEntry::compound("sub_repos", &self.sub_repos),
            TocEntry::simple("sub_repo_indices", self.sub_repo_indices),
            TocEntry::simple("metadata", self.metadata),
        ]
    }
}

/// A flattened view of one TOC descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocEntry {
    /// A fixed byte range.
    Simple {
        /// Section name.
        name: &'static str,
        /// The range.
        section: SimpleSection,
    },
    /// Items plus their offset table.
    Compound {
        /// Section name.
        name: &'static str,
        /// Range of the items.
        data: SimpleSection,
        /// Range of the offset table.
        index: SimpleSection,
        /// Items loaded from the offset table.
        items: usize,
    },
}

impl TocEntry {
    fn simple(name: &'static str, section: SimpleSection) -> Self {
        Self::Simple { name, section }
    }

    fn compound(name: &'static str, section: &CompoundSection) -> Self {
        Self::Compound {
            name,
            data: section.data,
            index: section.index,
            items: section.item_count(),
        }
    }

    /// Section name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple { name, .. } | Self::Compound { name, .. } => *name,
        }
    }

    /// Total payload bytes, including any offset table.
    #[must_use]
    pub fn total_len(&self) -> u64 {
        match self {
            Self::Simple { section, .. } => u64::from(section.length),
            Self::Compound { data, index, .. } => u64::from(data.length) + u64::from(index.length),
        }
    }
}

/// Contents of the metadata section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardMetadata {
    /// File format version.
    pub format_version: u32,
    /// Number of documents.
    pub document_count: u32,
}

impl ShardMetadata {
    /// Serialized length.
    pub const ENCODED_LEN: u32 = 8;

    /// Writes both fields as big-endian `u32`.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write<W: Write>(&self, w: &mut ShardWriter<W>) -> WriteResult<()> {
        w.u32(self.format_version)?;
        w.u32(self.document_count)
    }

    /// Reads the metadata section and checks the version.
    ///
    /// # Errors
    ///
    /// Fails on truncated input or an unsupported version.
    pub fn read(r: &mut ByteReader<'_>) -> CoreResult<Self> {
        let format_version = r.u32()?;
        if format_version != FORMAT_VERSION {
            return Err(CoreError::invalid_format(format!(
                "unsupported format version {format_version}, expected {FORMAT_VERSION}"
            )));
        }
        let document_count = r.u32()?;
        Ok(Self {
            format_version,
            document_count,
        })
    }
}
