//! CLI command implementations.

pub mod build;
pub mod dump;
pub mod inspect;
pub mod verify;

use codeshard_core::Shard;
use codeshard_storage::FileIndexFile;
use std::path::Path;
use std::sync::Arc;

/// Opens the shard file at `path`.
pub(crate) fn open_shard(path: &Path) -> Result<Shard, Box<dyn std::error::Error>> {
    let file = FileIndexFile::open(path)?;
    Ok(Shard::open(Arc::new(file))?)
}
