//! File-based index file reader.

use crate::backend::{check_range, IndexFile};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// An index file read from disk on demand.
///
/// Only the requested ranges are read; the file is never loaded whole.
/// The size is captured at open time, so the file must not be modified
/// while it is being served.
///
/// # Thread Safety
///
/// Reads seek a shared file handle, which is serialized behind a lock.
///
/// # Example
///
/// ```no_run
/// use codeshard_storage::{FileIndexFile, IndexFile};
/// use std::path::Path;
///
/// let file = FileIndexFile::open(Path::new("repo.shard")).unwrap();
/// let tail = file.read_at(file.size().unwrap() - 8, 8).unwrap();
/// ```
#[derive(Debug)]
pub struct FileIndexFile {
    path: PathBuf,
    name: String,
    file: RwLock<File>,
    size: u32,
}

impl FileIndexFile {
    /// Opens an existing index file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is larger than
    /// `u32::MAX` bytes.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let size = u32::try_from(len).map_err(|_| StorageError::TooLarge { size: len })?;

        Ok(Self {
            path: path.to_path_buf(),
            name: path.display().to_string(),
            file: RwLock::new(file),
            size,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IndexFile for FileIndexFile {
    fn read_at(&self, offset: u32, len: u32) -> StorageResult<Vec<u8>> {
        check_range(&self.name, offset, len, self.size)?;

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(u64::from(offset)))?;

        let mut buffer = vec![0u8; len as usize];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn size(&self) -> StorageResult<u32> {
        Ok(self.size)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
