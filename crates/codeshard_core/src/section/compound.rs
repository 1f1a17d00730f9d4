//! Variable-length items with an offset table.

use super::{Section, SimpleSection};
use crate::error::{CoreError, CoreResult, WriteResult};
use crate::index_data::IndexData;
use crate::reader::ByteReader;
use crate::writer::ShardWriter;
use std::io::Write;

/// A list of variable-sized items.
///
/// Items are stored back to back in `data`, with no separators. After the
/// data, `index` holds the absolute file offset of every item as a
/// big-endian `u32`, in append order.
///
/// # Writing
///
/// ```text
/// start(w)  add_item(w, a)  add_item(w, b) ...  end(w)
/// ```
///
/// # Reading
///
/// [`Section::read`] restores only the two descriptors; call
/// [`CompoundSection::read_index`] to load the offset table before reading
/// items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSection {
    /// Range of the concatenated items.
    pub data: SimpleSection,
    offsets: Vec<u32>,
    /// Range of the offset table.
    pub index: SimpleSection,
}

impl CompoundSection {
    /// Creates an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the data range.
    pub fn start<W: Write>(&mut self, w: &ShardWriter<W>) {
        self.data.start(w);
    }

    /// Records the item's offset and writes its bytes.
    ///
    /// Must be called between [`CompoundSection::start`] and
    /// [`CompoundSection::end`]. Empty items are allowed.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn add_item<W: Write>(&mut self, w: &mut ShardWriter<W>, item: &[u8]) -> WriteResult<()> {
        self.offsets.push(w.offset());
        w.write(item)
    }

    /// Closes the data range and writes the offset table.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn end<W: Write>(&mut self, w: &mut ShardWriter<W>) -> WriteResult<()> {
        self.data.end(w);
        self.index.start(w);
        for &offset in &self.offsets {
            w.u32(offset)?;
        }
        self.index.end(w);
        tracing::debug!(
            items = self.offsets.len(),
            data_offset = self.data.offset,
            data_length = self.data.length,
            "compound section written"
        );
        Ok(())
    }

    /// Loads the offset table from a finished shard.
    ///
    /// # Errors
    ///
    /// Fails if the index range cannot be read or is misaligned.
    pub fn read_index(&mut self, data: &IndexData) -> CoreResult<()> {
        self.offsets = data.read_section_u32(self.index)?;
        Ok(())
    }

    /// Number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.offsets.len()
    }

    /// Absolute start offset of every item, in append order.
    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Item offsets plus a final element marking the end of the last item.
    ///
    /// Item `i` spans `[abs[i], abs[i + 1])`.
    #[must_use]
    pub fn absolute_index(&self) -> Vec<u32> {
        let mut index = Vec::with_capacity(self.offsets.len() + 1);
        index.extend_from_slice(&self.offsets);
        index.push(self.data.limit());
        index
    }

    /// Item offsets relative to the first item, plus the data length as a
    /// final element.
    ///
    /// Empty for a section without items: there is no terminator then.
    /// Offsets below the first one, which only a corrupt offset table can
    /// hold, clamp to zero.
    #[must_use]
    pub fn relative_index(&self) -> Vec<u32> {
        let Some(&first) = self.offsets.first() else {
            return Vec::new();
        };
        let mut index = Vec::with_capacity(self.offsets.len() + 1);
        index.extend(self.offsets.iter().map(|&o| o.saturating_sub(first)));
        index.push(self.data.length);
        index
    }

    /// File range of item `i`.
    ///
    /// # Errors
    ///
    /// [`CoreError::ItemOutOfRange`] for `i >= item_count()`,
    /// [`CoreError::BlobOutsideData`] if the stored offsets do not describe a
    /// range inside the data region.
    pub fn item_range(&self, i: usize) -> CoreResult<SimpleSection> {
        let count = self.offsets.len();
        if i >= count {
            return Err(CoreError::ItemOutOfRange { index: i, count });
        }
        let start = self.offsets[i];
        let end = self
            .offsets
            .get(i + 1)
            .copied()
            .unwrap_or_else(|| self.data.limit());

        if end < start || !self.data.contains(SimpleSection::new(start, end - start)) {
            return Err(CoreError::BlobOutsideData {
                index: i,
                start,
                end,
                data_start: self.data.offset,
                data_end: self.data.limit(),
            });
        }
        Ok(SimpleSection::new(start, end - start))
    }

    /// Reads the bytes of item `i`.
    ///
    /// # Errors
    ///
    /// See [`CompoundSection::item_range`]; also fails if the file is
    /// shorter than the range.
    pub fn read_blob(&self, data: &IndexData, i: usize) -> CoreResult<Vec<u8>> {
        data.read_section_blob(self.item_range(i)?)
    }
}

impl Section for CompoundSection {
    const DESCRIPTOR_LEN: u32 = 2 * SimpleSection::DESCRIPTOR_LEN;

    fn read(r: &mut ByteReader<'_>) -> CoreResult<Self> {
        let data = SimpleSection::read(r)?;
        let index = SimpleSection::read(r)?;
        Ok(Self {
            data,
            offsets: Vec::new(),
            index,
        })
    }

    fn write<W: Write>(&self, w: &mut ShardWriter<W>) -> WriteResult<()> {
        self.data.write(w)?;
        self.index.write(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeshard_storage::{InMemoryIndexFile, IndexFile};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn build(prefix: &[u8], items: &[&[u8]]) -> (CompoundSection, IndexData) {
        let mut w = ShardWriter::new(Vec::new());
        w.write(prefix).unwrap();
        let mut section = CompoundSection::new();
        section.start(&w);
        for item in items {
            section.add_item(&mut w, item).unwrap();
        }
        section.end(&mut w).unwrap();
        let file = InMemoryIndexFile::new("test", w.into_inner().unwrap()).unwrap();
        (section, IndexData::new(Arc::new(file)))
    }

    /// Persists the descriptors and reads them back with the offset table.
    fn reopen(section: &CompoundSection, data: &IndexData) -> CompoundSection {
        let mut w = ShardWriter::new(Vec::new());
        section.write(&mut w).unwrap();
        let bytes = w.into_inner().unwrap();
        assert_eq!(bytes.len() as u32, CompoundSection::DESCRIPTOR_LEN);

        let mut loaded = CompoundSection::read(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(loaded.item_count(), 0);
        loaded.read_index(data).unwrap();
        loaded
    }

    #[test]
    fn foo_empty_bar() {
        let (section, data) = build(b"", &[b"foo", b"", b"bar"]);
        assert_eq!(section.offsets(), &[0, 3, 3]);
        assert_eq!(section.absolute_index(), vec![0, 3, 3, 6]);

        let loaded = reopen(&section, &data);
        assert_eq!(loaded, section);
        assert_eq!(loaded.read_blob(&data, 0).unwrap(), b"foo");
        assert_eq!(loaded.read_blob(&data, 1).unwrap(), b"");
        assert_eq!(loaded.read_blob(&data, 2).unwrap(), b"bar");
    }

    #[test]
    fn payload_layout() {
        let (section, data) = build(b"", &[b"foo", b"", b"bar"]);
        let file = data.file();
        let bytes = file.read_at(0, file.size().unwrap()).unwrap();
        assert_eq!(
            bytes,
            [
                b'f', b'o', b'o', b'b', b'a', b'r', // data
                0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 3, // index
            ]
        );
        assert_eq!(section.data, SimpleSection::new(0, 6));
        assert_eq!(section.index, SimpleSection::new(6, 12));
    }

    #[test]
    fn offsets_are_file_absolute() {
        let (section, data) = build(b"prefix", &[b"ab", b"cde"]);
        assert_eq!(section.offsets(), &[6, 8]);
        assert_eq!(section.absolute_index(), vec![6, 8, 11]);
        assert_eq!(section.relative_index(), vec![0, 2, 5]);

        let loaded = reopen(&section, &data);
        assert_eq!(loaded.read_blob(&data, 1).unwrap(), b"cde");
    }

    #[test]
    fn empty_section_indexes() {
        let (section, data) = build(b"xyz", &[]);
        assert_eq!(section.item_count(), 0);
        assert_eq!(section.absolute_index(), vec![3]);
        assert!(section.relative_index().is_empty());
        assert_eq!(section.index, SimpleSection::new(3, 0));

        let loaded = reopen(&section, &data);
        assert!(matches!(
            loaded.read_blob(&data, 0),
            Err(CoreError::ItemOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn relative_index_clamps_offsets_below_first() {
        let (mut section, _) = build(b"", &[b"abc", b"def"]);
        section.offsets = vec![10, 4];
        assert_eq!(section.relative_index(), vec![0, 0, 6]);
    }

    #[test]
    fn out_of_range_item_fails() {
        let (section, data) = build(b"", &[b"a", b"b"]);
        assert!(matches!(
            section.read_blob(&data, 2),
            Err(CoreError::ItemOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn corrupt_offsets_are_rejected() {
        let (mut section, data) = build(b"", &[b"abc", b"def"]);
        // Offsets claiming an item before the data region.
        section.data = SimpleSection::new(2, 4);
        assert!(matches!(
            section.read_blob(&data, 0),
            Err(CoreError::BlobOutsideData { index: 0, .. })
        ));
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let mut section = CompoundSection::new();
        section.data = SimpleSection::new(0, 10);
        section.offsets = vec![5, 2];
        assert!(matches!(
            section.item_range(0),
            Err(CoreError::BlobOutsideData { start: 5, end: 2, .. })
        ));
    }

    #[test]
    fn truncated_index_fails() {
        let (section, _) = build(b"", &[b"a", b"b", b"c"]);
        // A file cut off in the middle of the offset table.
        let short = InMemoryIndexFile::new("short", b"abc\0\0\0\0\0\0".to_vec()).unwrap();
        let mut loaded = section.clone();
        assert!(loaded.read_index(&IndexData::new(Arc::new(short))).is_err());
    }

    proptest! {
        #[test]
        fn items_survive_write_and_read(
            prefix in prop::collection::vec(any::<u8>(), 0..16),
            items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..24),
        ) {
            let refs: Vec<&[u8]> = items.iter().map(Vec::as_slice).collect();
            let (section, data) = build(&prefix, &refs);

            let offsets = section.offsets();
            prop_assert!(offsets.windows(2).all(|p| p[0] <= p[1]));
            let absolute = section.absolute_index();
            prop_assert_eq!(absolute.len(), offsets.len() + 1);
            prop_assert_eq!(*absolute.last().unwrap(), section.data.offset + section.data.length);

            let relative = section.relative_index();
            if !items.is_empty() {
                prop_assert_eq!(relative[0], 0);
                prop_assert_eq!(relative.len(), offsets.len() + 1);
                prop_assert_eq!(*relative.last().unwrap(), section.data.length);
            }

            let loaded = reopen(&section, &data);
            for (i, item) in items.iter().enumerate() {
                prop_assert_eq!(&loaded.read_blob(&data, i).unwrap(), item);
            }
        }
    }
}
