//! Building and reading whole shards.

use codeshard_core::{AddOutcome, BuilderConfig, CoreError, Document, ShardBuilder};
use codeshard_testkit::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

#[test]
fn sample_repository_round_trips() {
    let docs = scenarios::sample_repository();
    let shard = TestShard::build(&docs);

    assert_eq!(shard.document_count(), docs.len());
    assert_eq!(shard.branches(), ["main", "release"]);
    assert_eq!(shard.sub_repositories(), ["", "vendor/zlib"]);
    for (i, doc) in docs.iter().enumerate() {
        assert_eq!(&shard.document(i).unwrap(), doc);
    }
    assert_eq!(shard.sub_repository(3).unwrap(), "vendor/zlib");
}

#[test]
fn file_and_memory_shards_are_identical() {
    let docs = scenarios::sample_repository();
    let memory = TestShard::build(&docs);
    let file = TestShardFile::build(&docs);

    assert_eq!(std::fs::read(file.path()).unwrap(), memory.bytes);
    for i in 0..docs.len() {
        assert_eq!(file.document(i).unwrap(), memory.document(i).unwrap());
    }
}

#[test]
fn trailer_locates_toc() {
    let shard = TestShard::build(&scenarios::sample_repository());
    let bytes = &shard.bytes;
    let trailer = &bytes[bytes.len() - 8..];
    let toc_offset = u32::from_be_bytes(trailer[..4].try_into().unwrap());
    let toc_length = u32::from_be_bytes(trailer[4..].try_into().unwrap());

    assert_eq!(toc_length, codeshard_core::Toc::ENCODED_LEN);
    assert_eq!((toc_offset + toc_length) as usize, bytes.len() - 8);
    // Descriptor count.
    assert_hex(&bytes[toc_offset as usize..toc_offset as usize + 4], "0000000a");
}

#[test]
fn sections_are_laid_out_in_order() {
    let shard = TestShard::build(&scenarios::sample_repository());
    let entries = shard.toc().entries();
    let mut end = 0u64;
    for entry in &entries {
        let start = match *entry {
            codeshard_core::TocEntry::Simple { section, .. } => section.offset,
            codeshard_core::TocEntry::Compound { data, .. } => data.offset,
        };
        assert_eq!(u64::from(start), end, "{} starts after a gap", entry.name());
        end += entry.total_len();
    }
}

#[test]
fn branch_limit_is_enforced() {
    let mut builder = ShardBuilder::new(BuilderConfig::new().max_branches(2));
    builder
        .add(Document::new("a", "").with_branch("x").with_branch("y"))
        .unwrap();
    let err = builder
        .add(Document::new("b", "").with_branch("z"))
        .unwrap_err();
    assert!(matches!(err, CoreError::TooManyBranches { limit: 2 }));
    // The rejected document left nothing behind.
    assert_eq!(builder.document_count(), 1);
    builder
        .add(Document::new("c", "").with_branch("y"))
        .unwrap();
}

#[test]
fn sixty_four_branches_fit() {
    let docs = scenarios::one_branch_per_document(64);
    let shard = TestShard::build(&docs);
    assert_eq!(shard.branches().len(), 64);
    assert_eq!(shard.document_branches(63).unwrap(), ["branch-63"]);
}

#[test]
fn oversized_documents_are_skipped() {
    let mut builder = ShardBuilder::new(BuilderConfig::new().size_max(4));
    assert_eq!(
        builder.add(Document::new("small", "abcd")).unwrap(),
        AddOutcome::Added { index: 0 }
    );
    assert_eq!(
        builder.add(Document::new("big", "abcde")).unwrap(),
        AddOutcome::SkippedTooLarge
    );
    let (bytes, stats) = builder.finish(Vec::new()).unwrap();
    assert_eq!(stats.documents, 1);
    assert_eq!(stats.skipped, 1);

    let shard = open_bytes(bytes).unwrap();
    assert_eq!(shard.document_count(), 1);
    assert_eq!(shard.name(0).unwrap(), "small");
}

#[test]
fn shard_reports_full() {
    let mut builder = ShardBuilder::new(BuilderConfig::new().shard_max(100));
    for doc in scenarios::large_repository(3, 4) {
        builder.add(doc).unwrap();
    }
    assert!(builder.is_full());
}

#[test]
fn concurrent_readers_see_same_documents() {
    let docs = scenarios::large_repository(40, 20);
    let shard = Arc::new(TestShard::build(&docs).shard);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shard = Arc::clone(&shard);
            let docs = docs.clone();
            std::thread::spawn(move || {
                for i in (t..docs.len()).step_by(4) {
                    assert_eq!(shard.document(i).unwrap(), docs[i]);
                    assert_eq!(shard.newlines(i).unwrap().len(), 20);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn arbitrary_documents_round_trip(docs in document_batch_strategy(0, 24)) {
        let shard = TestShard::build(&docs);
        prop_assert_eq!(shard.document_count(), docs.len());

        for (i, doc) in docs.iter().enumerate() {
            let read = shard.document(i).unwrap();
            prop_assert_eq!(&read.name, &doc.name);
            prop_assert_eq!(&read.content, &doc.content);
            prop_assert_eq!(&read.sub_repository_path, &doc.sub_repository_path);

            let mut expected: Vec<&String> = doc.branches.iter().collect();
            expected.sort_by_key(|b| shard.branches().iter().position(|n| n == *b));
            prop_assert_eq!(read.branches.iter().collect::<Vec<_>>(), expected);

            let folded = shard.folded_content(i).unwrap();
            prop_assert_eq!(folded, doc.content.to_ascii_lowercase());

            let newlines: Vec<u32> = doc
                .content
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(at, _)| at as u32)
                .collect();
            prop_assert_eq!(shard.newlines(i).unwrap(), newlines);
        }
    }

    #[test]
    fn content_and_case_bits_stay_paired(docs in document_batch_strategy(1, 16)) {
        let shard = TestShard::build(&docs);
        let toc = shard.toc();
        prop_assert_eq!(toc.contents.content.item_count(), docs.len());
        prop_assert_eq!(toc.contents.case_bits.item_count(), docs.len());
        prop_assert_eq!(toc.names.case_bits.item_count(), docs.len());
        prop_assert_eq!(toc.contents.case_bits.data.offset, toc.contents.content.index.limit());
    }

    #[test]
    fn truncated_shards_never_open(docs in document_batch_strategy(1, 8), cut in 1usize..64) {
        let shard = TestShard::build(&docs);
        let keep = shard.bytes.len().saturating_sub(cut);
        prop_assert!(open_bytes(shard.bytes[..keep].to_vec()).is_err());
    }
}
