//! Test fixtures and shard helpers.
//!
//! Provides convenience functions for building test shards and common test
//! scenarios.

use codeshard_core::{BuildStats, BuilderConfig, Document, Shard, ShardBuilder};
use codeshard_storage::{FileIndexFile, InMemoryIndexFile};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A shard built in memory, with its raw bytes.
pub struct TestShard {
    /// The opened shard.
    pub shard: Shard,
    /// The file contents.
    pub bytes: Vec<u8>,
    /// Statistics of the build.
    pub stats: BuildStats,
}

impl TestShard {
    /// Builds `docs` with the default configuration.
    pub fn build(docs: &[Document]) -> Self {
        Self::build_with(BuilderConfig::default(), docs)
    }

    /// Builds `docs` with `config`.
    pub fn build_with(config: BuilderConfig, docs: &[Document]) -> Self {
        let mut builder = ShardBuilder::new(config);
        for doc in docs {
            builder.add(doc.clone()).expect("Failed to add document");
        }
        let (bytes, stats) = builder.finish(Vec::new()).expect("Failed to finish shard");
        Self {
            shard: open_bytes(bytes.clone()).expect("Failed to open shard"),
            bytes,
            stats,
        }
    }
}

impl std::ops::Deref for TestShard {
    type Target = Shard;

    fn deref(&self) -> &Self::Target {
        &self.shard
    }
}

/// A shard published to a temporary directory.
pub struct TestShardFile {
    /// The opened shard.
    pub shard: Shard,
    path: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestShardFile {
    /// Builds `docs` into `test.shard` in a fresh temporary directory.
    pub fn build(docs: &[Document]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("test.shard");

        let mut builder = ShardBuilder::default();
        for doc in docs {
            builder.add(doc.clone()).expect("Failed to add document");
        }
        builder.finish_to_path(&path).expect("Failed to publish shard");

        let file = FileIndexFile::open(&path).expect("Failed to open shard file");
        Self {
            shard: Shard::open(Arc::new(file)).expect("Failed to open shard"),
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the shard file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::ops::Deref for TestShardFile {
    type Target = Shard;

    fn deref(&self) -> &Self::Target {
        &self.shard
    }
}

/// Opens a shard from raw bytes.
pub fn open_bytes(bytes: Vec<u8>) -> codeshard_core::CoreResult<Shard> {
    let file = InMemoryIndexFile::new("test", bytes)?;
    Shard::open(Arc::new(file))
}

/// Runs a test against a shard built in memory from `docs`.
///
/// # Example
///
/// ```rust
/// use codeshard_core::Document;
/// use codeshard_testkit::with_temp_shard;
///
/// with_temp_shard(&[Document::new("a.rs", "fn a() {}")], |shard| {
///     assert_eq!(shard.name(0).unwrap(), "a.rs");
/// });
/// ```
pub fn with_temp_shard<F, R>(docs: &[Document], f: F) -> R
where
    F: FnOnce(&Shard) -> R,
{
    let test_shard = TestShard::build(docs);
    f(&test_shard.shard)
}

/// Runs a test against a shard published to a temporary file.
pub fn with_file_shard<F, R>(docs: &[Document], f: F) -> R
where
    F: FnOnce(&Shard, &Path) -> R,
{
    let test_shard = TestShardFile::build(docs);
    f(&test_shard.shard, test_shard.path())
}

/// A sink that accepts `budget` bytes and then fails every write.
///
/// Counts the calls it receives so tests can check that a poisoned writer
/// stops touching its stream.
#[derive(Debug)]
pub struct FailingSink {
    /// Bytes accepted so far.
    pub written: Vec<u8>,
    budget: usize,
    /// Number of `write` calls received.
    pub calls: usize,
}

impl FailingSink {
    /// Creates a sink that fails once `budget` bytes were written.
    pub fn new(budget: usize) -> Self {
        Self {
            written: Vec::new(),
            budget,
            calls: 0,
        }
    }
}

impl io::Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        let room = self.budget - self.written.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A small repository on two branches with one vendored sub-repository.
    pub fn sample_repository() -> Vec<Document> {
        vec![
            Document::new(
                "src/Main.rs",
                "fn main() {\n    println!(\"Hello, World\");\n}\n",
            )
            .with_branch("main")
            .with_branch("release"),
            Document::new("README.md", "# Sample\n\nSee DOCS.\n").with_branch("main"),
            Document::new("empty.txt", "").with_branch("main"),
            Document::new("vendor/zlib/Zlib.H", "#define ZLIB_VERSION \"1.3\"\n")
                .with_branch("release")
                .with_sub_repository("vendor/zlib"),
        ]
    }

    /// `count` documents, each on its own branch.
    pub fn one_branch_per_document(count: usize) -> Vec<Document> {
        (0..count)
            .map(|i| {
                Document::new(format!("file_{i}.txt"), format!("Document {i}\n"))
                    .with_branch(format!("branch-{i}"))
            })
            .collect()
    }

    /// `count` documents of `lines` lines each, cycling through three branches.
    pub fn large_repository(count: usize, lines: usize) -> Vec<Document> {
        const BRANCHES: [&str; 3] = ["main", "dev", "stable"];
        (0..count)
            .map(|i| {
                let content: String = (0..lines)
                    .map(|l| format!("Line {l} of File{i}\n"))
                    .collect();
                Document::new(format!("dir{}/File{i}.rs", i % 7), content)
                    .with_branch(BRANCHES[i % BRANCHES.len()])
            })
            .collect()
    }
}
