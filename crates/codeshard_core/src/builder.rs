//! Shard builder.
//!
//! Ingestion code hands documents to a [`ShardBuilder`] one at a time. The
//! builder keeps them in memory and writes the whole shard in one sequential
//! pass on [`ShardBuilder::finish`].

use crate::case::SearchableString;
use crate::config::BuilderConfig;
use crate::error::{CoreError, CoreResult};
use crate::section::{Section, SimpleSection};
use crate::toc::{ShardMetadata, Toc, FORMAT_VERSION};
use crate::writer::ShardWriter;
use codeshard_codec::encode_deltas;
use codeshard_storage::PendingFile;
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A document as supplied by ingestion and as read back from a shard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Path of the file within its repository.
    pub name: String,
    /// Raw file content.
    pub content: Vec<u8>,
    /// Branches the file appears on.
    pub branches: Vec<String>,
    /// Path of the sub-repository holding the file, `""` for the root.
    pub sub_repository_path: String,
}

impl Document {
    /// Creates a document on no branch in the root repository.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Adds a branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branches.push(branch.into());
        self
    }

    /// Sets the sub-repository path.
    #[must_use]
    pub fn with_sub_repository(mut self, path: impl Into<String>) -> Self {
        self.sub_repository_path = path.into();
        self
    }
}

/// What [`ShardBuilder::add`] did with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored as document number `index`.
    Added {
        /// Document number within the shard.
        index: u32,
    },
    /// Not stored: content exceeds [`BuilderConfig::size_max`].
    SkippedTooLarge,
}

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildStats {
    /// Documents stored.
    pub documents: usize,
    /// Documents skipped for size.
    pub skipped: usize,
    /// Content bytes stored.
    pub content_bytes: u64,
    /// Distinct branch names.
    pub branches: usize,
    /// Size of the shard file.
    pub shard_bytes: u32,
}

/// Accumulates documents and writes them as one shard.
#[derive(Debug)]
pub struct ShardBuilder {
    config: BuilderConfig,
    contents: Vec<SearchableString>,
    names: Vec<SearchableString>,
    newlines: Vec<Vec<u8>>,
    branch_masks: Vec<u64>,
    sub_repo_indices: Vec<u32>,
    branch_names: Vec<String>,
    branch_ids: HashMap<String, usize>,
    sub_repos: Vec<String>,
    sub_repo_ids: HashMap<String, u32>,
    content_bytes: u64,
    skipped: usize,
}

impl Default for ShardBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl ShardBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        let root = String::new();
        Self {
            config,
            contents: Vec::new(),
            names: Vec::new(),
            newlines: Vec::new(),
            branch_masks: Vec::new(),
            sub_repo_indices: Vec::new(),
            branch_names: Vec::new(),
            branch_ids: HashMap::new(),
            sub_repo_ids: HashMap::from([(root.clone(), 0)]),
            sub_repos: vec![root],
            content_bytes: 0,
            skipped: 0,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Number of documents stored so far.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.contents.len()
    }

    /// Whether the stored content has reached [`BuilderConfig::shard_max`].
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.content_bytes >= self.config.shard_max as u64
    }

    /// Adds a document.
    ///
    /// Content is case-folded, its newline offsets recorded, and its branch
    /// names mapped onto the shard's branch table.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidDocument`] for an empty name or a full shard,
    /// [`CoreError::TooManyBranches`] if the document would push the number
    /// of distinct branch names past [`BuilderConfig::max_branches`].
    pub fn add(&mut self, doc: Document) -> CoreResult<AddOutcome> {
        if doc.name.is_empty() {
            return Err(CoreError::invalid_document("document name is empty"));
        }
        let index = u32::try_from(self.contents.len())
            .ok()
            .filter(|&i| i < u32::MAX)
            .ok_or_else(|| CoreError::invalid_document("shard holds too many documents"))?;

        if doc.content.len() > self.config.size_max {
            tracing::warn!(
                name = %doc.name,
                size = doc.content.len(),
                size_max = self.config.size_max,
                "skipping oversized document"
            );
            self.skipped += 1;
            return Ok(AddOutcome::SkippedTooLarge);
        }

        let newlines = encode_deltas(&newline_offsets(&doc.content)?)?;
        let branch_mask = self.branch_mask(&doc.branches)?;
        let sub_repo = self.sub_repo_id(doc.sub_repository_path);

        self.content_bytes += doc.content.len() as u64;
        self.contents.push(SearchableString::new(&doc.content));
        self.names.push(SearchableString::new(doc.name.as_bytes()));
        self.newlines.push(newlines);
        self.branch_masks.push(branch_mask);
        self.sub_repo_indices.push(sub_repo);

        tracing::debug!(name = %doc.name, index, "added document");
        Ok(AddOutcome::Added { index })
    }

    /// Writes the shard to `out` and returns it with build statistics.
    ///
    /// # Errors
    ///
    /// Returns the first write failure; the output is then incomplete and
    /// must be discarded.
    pub fn finish<W: Write>(self, out: W) -> CoreResult<(W, BuildStats)> {
        let mut w = ShardWriter::new(out);
        let mut toc = Toc::default();

        toc.contents.write_strings(&mut w, &self.contents)?;
        toc.names.write_strings(&mut w, &self.names)?;

        toc.newlines.start(&w);
        for blob in &self.newlines {
            toc.newlines.add_item(&mut w, blob)?;
        }
        toc.newlines.end(&mut w)?;

        toc.branch_masks.start(&w);
        for &mask in &self.branch_masks {
            w.u64(mask)?;
        }
        toc.branch_masks.end(&w);

        toc.branch_names.start(&w);
        for name in &self.branch_names {
            toc.branch_names.add_item(&mut w, name.as_bytes())?;
        }
        toc.branch_names.end(&mut w)?;

        toc.sub_repos.start(&w);
        for path in &self.sub_repos {
            toc.sub_repos.add_item(&mut w, path.as_bytes())?;
        }
        toc.sub_repos.end(&mut w)?;

        toc.sub_repo_indices.start(&w);
        for &id in &self.sub_repo_indices {
            w.varint(u64::from(id))?;
        }
        toc.sub_repo_indices.end(&w);

        toc.metadata.start(&w);
        ShardMetadata {
            format_version: FORMAT_VERSION,
            // add() caps the count at u32::MAX
            document_count: self.contents.len() as u32,
        }
        .write(&mut w)?;
        toc.metadata.end(&w);

        let mut toc_section = SimpleSection::default();
        toc_section.start(&w);
        toc.write(&mut w)?;
        toc_section.end(&w);
        toc_section.write(&mut w)?;

        w.flush()?;
        let stats = BuildStats {
            documents: self.contents.len(),
            skipped: self.skipped,
            content_bytes: self.content_bytes,
            branches: self.branch_names.len(),
            shard_bytes: w.offset(),
        };
        let out = w.into_inner()?;

        tracing::info!(
            documents = stats.documents,
            skipped = stats.skipped,
            bytes = stats.shard_bytes,
            "shard finished"
        );
        Ok((out, stats))
    }

    /// Writes the shard to `path`, replacing any existing file.
    ///
    /// The file only appears once it has been written completely.
    ///
    /// # Errors
    ///
    /// Returns write, sync or rename failures; nothing is left at `path`
    /// when writing fails.
    pub fn finish_to_path(self, path: &Path) -> CoreResult<(PathBuf, BuildStats)> {
        let pending = PendingFile::create(path)?;
        let (out, stats) = self.finish(BufWriter::new(pending))?;
        let pending = out.into_inner().map_err(|e| CoreError::Io(e.into_error()))?;
        Ok((pending.publish()?, stats))
    }

    fn branch_mask(&mut self, branches: &[String]) -> CoreResult<u64> {
        let new_names = branches
            .iter()
            .filter(|b| !self.branch_ids.contains_key(b.as_str()))
            .collect::<std::collections::HashSet<_>>()
            .len();
        if self.branch_names.len() + new_names > self.config.max_branches {
            return Err(CoreError::TooManyBranches {
                limit: self.config.max_branches,
            });
        }

        let mut mask = 0u64;
        for branch in branches {
            let id = match self.branch_ids.get(branch) {
                Some(&id) => id,
                None => {
                    let id = self.branch_names.len();
                    self.branch_names.push(branch.clone());
                    self.branch_ids.insert(branch.clone(), id);
                    id
                }
            };
            mask |= 1u64 << id;
        }
        Ok(mask)
    }

    fn sub_repo_id(&mut self, path: String) -> u32 {
        if let Some(&id) = self.sub_repo_ids.get(&path) {
            return id;
        }
        // Bounded by the document count, which add() keeps within u32.
        let id = self.sub_repos.len() as u32;
        self.sub_repos.push(path.clone());
        self.sub_repo_ids.insert(path, id);
        id
    }
}

/// Offsets of every `\n` byte in `content`.
fn newline_offsets(content: &[u8]) -> CoreResult<Vec<u32>> {
    content
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'\n')
        .map(|(i, _)| {
            u32::try_from(i).map_err(|_| {
                CoreError::invalid_document(format!("newline at offset {i} exceeds 4 GiB"))
            })
        })
        .collect()
}
