//! Atomic publication of newly written shard files.

use crate::error::{StorageError, StorageResult};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A shard file under construction.
///
/// Bytes go to a temporary file in the destination directory. The file only
/// appears at its final path once [`PendingFile::publish`] succeeds, so a
/// reader never observes a partially written shard. Dropping a
/// `PendingFile` without publishing removes the temporary file.
///
/// # Example
///
/// ```no_run
/// use codeshard_storage::PendingFile;
/// use std::io::Write;
/// use std::path::Path;
///
/// let mut pending = PendingFile::create(Path::new("out/repo.shard")).unwrap();
/// pending.write_all(b"...").unwrap();
/// pending.publish().unwrap();
/// ```
#[derive(Debug)]
pub struct PendingFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl PendingFile {
    /// Starts a new pending file that will be published at `target`.
    ///
    /// Parent directories are created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or temporary file cannot be created.
    pub fn create(target: &Path) -> StorageResult<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;
        let temp = tempfile::Builder::new()
            .prefix(".codeshard-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    /// The path the file will be published at.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Syncs the data and renames the file onto its target path.
    ///
    /// # Errors
    ///
    /// Returns an error if syncing or the rename fails.
    pub fn publish(mut self) -> StorageResult<PathBuf> {
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;
        self.temp
            .persist(&self.target)
            .map_err(|e| StorageError::Persist {
                path: self.target.display().to_string(),
                source: e.error,
            })?;
        tracing::debug!(path = %self.target.display(), "published shard file");
        Ok(self.target)
    }
}

impl Write for PendingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}
