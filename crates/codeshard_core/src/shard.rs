//! Read access to a finished shard.

use crate::builder::Document;
use crate::config::MAX_BRANCHES;
use crate::error::{CoreError, CoreResult};
use crate::index_data::IndexData;
use crate::reader::ByteReader;
use crate::section::{CompoundSection, Section, SimpleSection};
use crate::toc::{ShardMetadata, Toc, TRAILER_LEN};
use codeshard_codec::decode_deltas_into;
use codeshard_storage::IndexFile;
use std::sync::Arc;

/// An opened shard.
///
/// Opening loads the table of contents, every offset table and the small
/// per-document tables. Document bytes stay on storage and are read on
/// demand, so a `Shard` can be shared across threads and queried
/// concurrently.
#[derive(Debug, Clone)]
pub struct Shard {
    data: IndexData,
    toc: Toc,
    metadata: ShardMetadata,
    branch_masks: Vec<u64>,
    branch_names: Vec<String>,
    sub_repos: Vec<String>,
    sub_repo_indices: Vec<u32>,
}

impl Shard {
    /// Opens the shard stored in `file`.
    ///
    /// # Errors
    ///
    /// Fails if the file is truncated, any table is malformed, or the
    /// per-document sections disagree on the number of documents.
    pub fn open(file: Arc<dyn IndexFile>) -> CoreResult<Self> {
        let data = IndexData::new(file);
        let size = data.file().size()?;
        if size < TRAILER_LEN {
            return Err(CoreError::invalid_format(format!(
                "file of {size} bytes has no TOC descriptor"
            )));
        }

        let trailer_at = size - TRAILER_LEN;
        let trailer = data.read_section_blob(SimpleSection::new(trailer_at, TRAILER_LEN))?;
        let toc_section = SimpleSection::read(&mut ByteReader::new(&trailer))?;
        if toc_section.limit() > trailer_at {
            return Err(CoreError::invalid_format(format!(
                "TOC [{}, {}) overlaps the trailer at {trailer_at}",
                toc_section.offset,
                toc_section.limit()
            )));
        }

        let toc_blob = data.read_section_blob(toc_section)?;
        let mut toc = Toc::read(&mut ByteReader::new(&toc_blob))?;
        toc.read_index(&data)?;

        let metadata_blob = data.read_section_blob(toc.metadata)?;
        let metadata = ShardMetadata::read(&mut ByteReader::new(&metadata_blob))?;
        let count = metadata.document_count as usize;

        for (name, items) in [
            ("contents", toc.contents.item_count()),
            ("names", toc.names.item_count()),
            ("newlines", toc.newlines.item_count()),
        ] {
            if items != count {
                return Err(CoreError::invalid_format(format!(
                    "{name} section has {items} items for {count} documents"
                )));
            }
        }

        let branch_masks = read_branch_masks(&data, toc.branch_masks, count)?;
        let branch_names = read_strings(&data, &toc.branch_names)?;
        let sub_repos = read_strings(&data, &toc.sub_repos)?;
        let sub_repo_indices =
            read_sub_repo_indices(&data, toc.sub_repo_indices, count, sub_repos.len())?;

        if branch_names.len() > MAX_BRANCHES {
            return Err(CoreError::invalid_format(format!(
                "{} branch names, at most {MAX_BRANCHES} fit a branch mask",
                branch_names.len()
            )));
        }
        let known = if branch_names.len() == MAX_BRANCHES {
            u64::MAX
        } else {
            (1u64 << branch_names.len()) - 1
        };
        if let Some(mask) = branch_masks.iter().find(|&&m| m & !known != 0) {
            return Err(CoreError::invalid_format(format!(
                "branch mask {mask:#x} references unknown branches"
            )));
        }

        tracing::info!(
            file = data.file().name(),
            documents = count,
            branches = branch_names.len(),
            "opened shard"
        );

        Ok(Self {
            data,
            toc,
            metadata,
            branch_masks,
            branch_names,
            sub_repos,
            sub_repo_indices,
        })
    }

    /// Number of documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.metadata.document_count as usize
    }

    /// The table of contents, with offset tables loaded.
    #[must_use]
    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Format version and document count.
    #[must_use]
    pub fn metadata(&self) -> ShardMetadata {
        self.metadata
    }

    /// Range reader over the underlying file.
    #[must_use]
    pub fn index_data(&self) -> &IndexData {
        &self.data
    }

    /// All branch names, in bit order.
    #[must_use]
    pub fn branches(&self) -> &[String] {
        &self.branch_names
    }

    /// All sub-repository paths; the first is the root (`""`).
    #[must_use]
    pub fn sub_repositories(&self) -> &[String] {
        &self.sub_repos
    }

    /// Content of document `i` with its original casing.
    ///
    /// # Errors
    ///
    /// Fails if `i` is out of range or the file cannot be read.
    pub fn content(&self, i: usize) -> CoreResult<Vec<u8>> {
        self.toc.contents.read_original(&self.data, i)
    }

    /// Case-folded content of document `i`.
    ///
    /// # Errors
    ///
    /// Fails if `i` is out of range or the file cannot be read.
    pub fn folded_content(&self, i: usize) -> CoreResult<Vec<u8>> {
        self.toc.contents.content.read_blob(&self.data, i)
    }

    /// Path of document `i`.
    ///
    /// # Errors
    ///
    /// Fails if `i` is out of range, the file cannot be read, or the stored
    /// name is not UTF-8.
    pub fn name(&self, i: usize) -> CoreResult<String> {
        let bytes = self.toc.names.read_original(&self.data, i)?;
        String::from_utf8(bytes)
            .map_err(|_| CoreError::invalid_format(format!("name of document {i} is not UTF-8")))
    }

    /// Offsets of the newline bytes in document `i`.
    ///
    /// # Errors
    ///
    /// Fails if `i` is out of range or the stored blob is malformed.
    pub fn newlines(&self, i: usize) -> CoreResult<Vec<u32>> {
        let mut offsets = Vec::new();
        self.newlines_into(i, &mut offsets)?;
        Ok(offsets)
    }

    /// As [`Shard::newlines`], reusing `buf`.
    ///
    /// # Errors
    ///
    /// See [`Shard::newlines`].
    pub fn newlines_into(&self, i: usize, buf: &mut Vec<u32>) -> CoreResult<()> {
        let blob = self.toc.newlines.read_blob(&self.data, i)?;
        decode_deltas_into(&blob, buf)?;
        Ok(())
    }

    /// Branch names of document `i`, in bit order.
    ///
    /// # Errors
    ///
    /// [`CoreError::ItemOutOfRange`] if `i` is out of range.
    pub fn document_branches(&self, i: usize) -> CoreResult<Vec<String>> {
        let mask = *self.branch_masks.get(i).ok_or(CoreError::ItemOutOfRange {
            index: i,
            count: self.document_count(),
        })?;
        Ok(self
            .branch_names
            .iter()
            .enumerate()
            .filter(|&(bit, _)| mask & (1u64 << bit) != 0)
            .map(|(_, name)| name.clone())
            .collect())
    }

    /// Sub-repository path of document `i`.
    ///
    /// # Errors
    ///
    /// [`CoreError::ItemOutOfRange`] if `i` is out of range.
    pub fn sub_repository(&self, i: usize) -> CoreResult<&str> {
        let id = *self.sub_repo_indices.get(i).ok_or(CoreError::ItemOutOfRange {
            index: i,
            count: self.document_count(),
        })?;
        Ok(&self.sub_repos[id as usize])
    }

    /// Document `i` as it was added.
    ///
    /// Branches come back in the shard's bit order, without duplicates.
    ///
    /// # Errors
    ///
    /// Fails if `i` is out of range or any part cannot be read.
    pub fn document(&self, i: usize) -> CoreResult<Document> {
        Ok(Document {
            name: self.name(i)?,
            content: self.content(i)?,
            branches: self.document_branches(i)?,
            sub_repository_path: self.sub_repository(i)?.to_string(),
        })
    }
}

fn read_branch_masks(data: &IndexData, section: SimpleSection, count: usize) -> CoreResult<Vec<u64>> {
    if section.length as usize != count * 8 {
        return Err(CoreError::invalid_format(format!(
            "branch mask section has {} bytes for {count} documents",
            section.length
        )));
    }
    let blob = data.read_section_blob(section)?;
    let mut r = ByteReader::new(&blob);
    (0..count).map(|_| r.u64()).collect()
}

fn read_strings(data: &IndexData, section: &CompoundSection) -> CoreResult<Vec<String>> {
    (0..section.item_count())
        .map(|i| {
            let bytes = section.read_blob(data, i)?;
            String::from_utf8(bytes)
                .map_err(|_| CoreError::invalid_format(format!("string {i} is not UTF-8")))
        })
        .collect()
}

fn read_sub_repo_indices(
    data: &IndexData,
    section: SimpleSection,
    count: usize,
    sub_repos: usize,
) -> CoreResult<Vec<u32>> {
    let blob = data.read_section_blob(section)?;
    let mut r = ByteReader::new(&blob);
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let id = r.varint()?;
        if id >= sub_repos as u64 {
            return Err(CoreError::invalid_format(format!(
                "sub-repository index {id} out of range for {sub_repos} entries"
            )));
        }
        ids.push(id as u32);
    }
    if !r.is_empty() {
        return Err(CoreError::invalid_format(format!(
            "{} trailing bytes in sub-repository indices",
            r.remaining().len()
        )));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ShardBuilder;
    use codeshard_storage::InMemoryIndexFile;

    fn sample_docs() -> Vec<Document> {
        vec![
            Document::new("src/Main.rs", "fn main() {\n    println!(\"Hi\");\n}\n")
                .with_branch("main")
                .with_branch("release"),
            Document::new("README.md", "").with_branch("main"),
            Document::new("lib/Vendored.C", "int X;\n")
                .with_branch("release")
                .with_sub_repository("third_party/lib"),
        ]
    }

    fn build(docs: &[Document]) -> Vec<u8> {
        let mut builder = ShardBuilder::default();
        for doc in docs {
            builder.add(doc.clone()).unwrap();
        }
        builder.finish(Vec::new()).unwrap().0
    }

    fn open(bytes: Vec<u8>) -> CoreResult<Shard> {
        Shard::open(Arc::new(InMemoryIndexFile::new("test", bytes).unwrap()))
    }

    #[test]
    fn documents_round_trip() {
        let docs = sample_docs();
        let shard = open(build(&docs)).unwrap();

        assert_eq!(shard.document_count(), 3);
        assert_eq!(shard.branches(), ["main", "release"]);
        assert_eq!(shard.sub_repositories(), ["", "third_party/lib"]);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(&shard.document(i).unwrap(), doc);
        }
    }

    #[test]
    fn folded_content_and_newlines() {
        let shard = open(build(&sample_docs())).unwrap();
        assert_eq!(shard.folded_content(2).unwrap(), b"int x;\n");
        assert_eq!(shard.newlines(0).unwrap(), vec![11, 32, 34]);
        assert!(shard.newlines(1).unwrap().is_empty());

        let mut buf = vec![99; 8];
        shard.newlines_into(2, &mut buf).unwrap();
        assert_eq!(buf, vec![6]);
    }

    #[test]
    fn content_and_case_sections_pair_up() {
        let shard = open(build(&sample_docs())).unwrap();
        let toc = shard.toc();
        assert_eq!(toc.contents.content.item_count(), 3);
        assert_eq!(toc.contents.case_bits.item_count(), 3);
        assert_eq!(toc.names.case_bits.item_count(), 3);
    }

    #[test]
    fn empty_shard_opens() {
        let shard = open(ShardBuilder::default().finish(Vec::new()).unwrap().0).unwrap();
        assert_eq!(shard.document_count(), 0);
        assert!(shard.branches().is_empty());
        assert!(matches!(
            shard.document(0),
            Err(CoreError::ItemOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn out_of_range_document_fails() {
        let shard = open(build(&sample_docs())).unwrap();
        assert!(matches!(
            shard.content(3),
            Err(CoreError::ItemOutOfRange { index: 3, count: 3 })
        ));
        assert!(matches!(
            shard.document_branches(3),
            Err(CoreError::ItemOutOfRange { .. })
        ));
    }

    #[test]
    fn tiny_file_is_rejected() {
        assert!(matches!(
            open(vec![0, 0, 0]),
            Err(CoreError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let bytes = build(&sample_docs());
        for cut in [1, 8, 9, bytes.len() / 2] {
            let short = bytes[..bytes.len() - cut].to_vec();
            assert!(open(short).is_err(), "cut of {cut} bytes was accepted");
        }
    }

    #[test]
    fn bad_trailer_is_rejected() {
        let mut bytes = build(&sample_docs());
        let len = bytes.len();
        // TOC claims to extend into the trailer.
        bytes[len - 1] = bytes[len - 1].wrapping_add(1);
        assert!(matches!(open(bytes), Err(CoreError::InvalidFormat { .. })));
    }

    /// Writes a one-document shard whose branch table holds `branches`
    /// names and whose document carries `mask`.
    fn shard_with_branch_table(branches: usize, mask: u64) -> Vec<u8> {
        use crate::case::SearchableString;
        use crate::toc::FORMAT_VERSION;
        use crate::writer::ShardWriter;

        let mut w = ShardWriter::new(Vec::new());
        let mut toc = Toc::default();
        toc.contents
            .write_strings(&mut w, &[SearchableString::new(b"x")])
            .unwrap();
        toc.names
            .write_strings(&mut w, &[SearchableString::new(b"a.txt")])
            .unwrap();
        toc.newlines.start(&w);
        toc.newlines.add_item(&mut w, &[0]).unwrap();
        toc.newlines.end(&mut w).unwrap();
        toc.branch_masks.start(&w);
        w.u64(mask).unwrap();
        toc.branch_masks.end(&w);
        toc.branch_names.start(&w);
        for b in 0..branches {
            toc.branch_names
                .add_item(&mut w, format!("b{b}").as_bytes())
                .unwrap();
        }
        toc.branch_names.end(&mut w).unwrap();
        toc.sub_repos.start(&w);
        toc.sub_repos.add_item(&mut w, b"").unwrap();
        toc.sub_repos.end(&mut w).unwrap();
        toc.sub_repo_indices.start(&w);
        w.varint(0).unwrap();
        toc.sub_repo_indices.end(&w);
        toc.metadata.start(&w);
        ShardMetadata {
            format_version: FORMAT_VERSION,
            document_count: 1,
        }
        .write(&mut w)
        .unwrap();
        toc.metadata.end(&w);

        let mut toc_section = SimpleSection::default();
        toc_section.start(&w);
        toc.write(&mut w).unwrap();
        toc_section.end(&w);
        toc_section.write(&mut w).unwrap();
        w.into_inner().unwrap()
    }

    #[test]
    fn full_branch_table_opens() {
        let shard = open(shard_with_branch_table(MAX_BRANCHES, 1 << 63)).unwrap();
        assert_eq!(shard.document_branches(0).unwrap(), ["b63"]);
    }

    #[test]
    fn oversized_branch_table_is_rejected() {
        assert!(matches!(
            open(shard_with_branch_table(MAX_BRANCHES + 1, 1)),
            Err(CoreError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn shard_is_shareable_across_threads() {
        let shard = Arc::new(open(build(&sample_docs())).unwrap());
        let handles: Vec<_> = (0..3)
            .map(|i| {
                let shard = Arc::clone(&shard);
                std::thread::spawn(move || shard.name(i).unwrap())
            })
            .collect();
        let names: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(names, ["src/Main.rs", "README.md", "lib/Vendored.C"]);
    }
}
