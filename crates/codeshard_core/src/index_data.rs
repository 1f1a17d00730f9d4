//! Range reads against a finished shard.

use crate::error::{CoreError, CoreResult};
use crate::section::SimpleSection;
use codeshard_storage::IndexFile;
use std::sync::Arc;

/// Random-access reads of section ranges from an [`IndexFile`].
///
/// Cheap to clone; clones share the file.
#[derive(Clone)]
pub struct IndexData {
    file: Arc<dyn IndexFile>,
}

impl std::fmt::Debug for IndexData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexData")
            .field("file", &self.file.name())
            .finish()
    }
}

impl IndexData {
    /// Wraps `file`.
    pub fn new(file: Arc<dyn IndexFile>) -> Self {
        Self { file }
    }

    /// The underlying file.
    #[must_use]
    pub fn file(&self) -> &Arc<dyn IndexFile> {
        &self.file
    }

    /// Reads the bytes covered by `section`.
    ///
    /// # Errors
    ///
    /// Fails if the range extends past the end of the file.
    pub fn read_section_blob(&self, section: SimpleSection) -> CoreResult<Vec<u8>> {
        Ok(self.file.read_at(section.offset, section.length)?)
    }

    /// Reads `section` as a table of big-endian `u32` values.
    ///
    /// # Errors
    ///
    /// [`CoreError::MisalignedIndex`] if the length is not a multiple of
    /// four, or a storage error if the range cannot be read.
    pub fn read_section_u32(&self, section: SimpleSection) -> CoreResult<Vec<u32>> {
        if section.length % 4 != 0 {
            return Err(CoreError::MisalignedIndex {
                length: section.length,
            });
        }
        let blob = self.read_section_blob(section)?;
        Ok(blob
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}
