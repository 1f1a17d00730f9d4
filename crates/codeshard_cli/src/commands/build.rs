//! Build command implementation.

use codeshard_core::{AddOutcome, BuildStats, BuilderConfig, Document, ShardBuilder};
use std::path::{Path, PathBuf};

/// Options shared by every file of a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Branches every file is recorded on.
    pub branches: Vec<String>,
    /// Sub-repository path recorded for every file.
    pub sub_repo: String,
    /// Per-file size limit; the builder default when unset.
    pub size_max: Option<usize>,
    /// Content bytes after which a new shard is started; the builder
    /// default when unset.
    pub shard_max: Option<usize>,
}

impl BuildOptions {
    fn config(&self) -> BuilderConfig {
        let mut config = BuilderConfig::new();
        if let Some(size) = self.size_max {
            config = config.size_max(size);
        }
        if let Some(size) = self.shard_max {
            config = config.shard_max(size);
        }
        config
    }
}

/// Runs the build command.
pub fn run(
    output: &Path,
    files: &[PathBuf],
    options: &BuildOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    for (path, stats) in build(output, files, options)? {
        println!("Wrote {}", path.display());
        println!("  Documents:     {}", stats.documents);
        println!("  Skipped:       {}", stats.skipped);
        println!("  Branches:      {}", stats.branches);
        println!("  Content bytes: {}", stats.content_bytes);
        println!("  Shard bytes:   {}", stats.shard_bytes);
    }
    Ok(())
}

/// Builds shards from `files`, starting a new one whenever the current
/// shard reaches its size limit.
///
/// The first shard is published at `output`, later ones next to it as
/// `<stem>.<n>.<ext>`. At least one shard is always written.
pub fn build(
    output: &Path,
    files: &[PathBuf],
    options: &BuildOptions,
) -> Result<Vec<(PathBuf, BuildStats)>, Box<dyn std::error::Error>> {
    let mut shards = Vec::new();
    let mut builder = ShardBuilder::new(options.config());

    for file in files {
        let content = std::fs::read(file)
            .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
        let mut doc = Document::new(document_name(file), content)
            .with_sub_repository(options.sub_repo.clone());
        doc.branches.clone_from(&options.branches);

        if builder.add(doc)? == AddOutcome::SkippedTooLarge {
            println!("Skipped {} (too large)", file.display());
        }
        if builder.is_full() {
            let full = std::mem::replace(&mut builder, ShardBuilder::new(options.config()));
            let path = shard_path(output, shards.len());
            tracing::info!(
                path = %path.display(),
                documents = full.document_count(),
                "shard reached its size limit, starting a new one"
            );
            shards.push(full.finish_to_path(&path)?);
        }
    }

    if builder.document_count() > 0 || shards.is_empty() {
        let path = shard_path(output, shards.len());
        shards.push(builder.finish_to_path(&path)?);
    }
    Ok(shards)
}

/// Path of the `n`th shard of a build writing to `output`.
fn shard_path(output: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().unwrap_or_default().to_string_lossy();
    let name = match output.extension() {
        Some(ext) => format!("{stem}.{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{n}"),
    };
    output.with_file_name(name)
}

/// Path recorded for `file`: relative paths as given, with `/` separators.
fn document_name(file: &Path) -> String {
    file.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
