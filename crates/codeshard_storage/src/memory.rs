//! In-memory index file.

use crate::backend::{check_range, IndexFile};
use crate::error::{StorageError, StorageResult};

/// An index file held entirely in memory.
///
/// Suitable for:
/// - Unit tests
/// - Serving a shard that was just built into a `Vec<u8>`
///
/// # Example
///
/// ```rust
/// use codeshard_storage::{IndexFile, InMemoryIndexFile};
///
/// let file = InMemoryIndexFile::new("shard", b"hello world".to_vec()).unwrap();
/// assert_eq!(file.read_at(6, 5).unwrap(), b"world");
/// assert_eq!(file.size().unwrap(), 11);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryIndexFile {
    name: String,
    data: Vec<u8>,
}

impl InMemoryIndexFile {
    /// Wraps `data` as an index file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TooLarge`] if `data` exceeds `u32::MAX` bytes.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> StorageResult<Self> {
        if u32::try_from(data.len()).is_err() {
            return Err(StorageError::TooLarge {
                size: data.len() as u64,
            });
        }
        Ok(Self {
            name: name.into(),
            data,
        })
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl IndexFile for InMemoryIndexFile {
    fn read_at(&self, offset: u32, len: u32) -> StorageResult<Vec<u8>> {
        let size = self.data.len() as u32;
        check_range(&self.name, offset, len, size)?;
        let start = offset as usize;
        Ok(self.data[start..start + len as usize].to_vec())
    }

    fn size(&self) -> StorageResult<u32> {
        Ok(self.data.len() as u32)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_read_at_returns_correct_data() {
        let file = InMemoryIndexFile::new("mem", b"hello world".to_vec()).unwrap();
        assert_eq!(file.read_at(0, 5).unwrap(), b"hello");
        assert_eq!(file.read_at(6, 5).unwrap(), b"world");
    }

    #[test]
    fn memory_read_at_past_end_fails() {
        let file = InMemoryIndexFile::new("mem", b"hello".to_vec()).unwrap();
        let result = file.read_at(10, 5);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_read_at_extending_past_end_fails() {
        let file = InMemoryIndexFile::new("mem", b"hello".to_vec()).unwrap();
        let result = file.read_at(3, 10);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_read_at_overflowing_range_fails() {
        let file = InMemoryIndexFile::new("mem", b"hello".to_vec()).unwrap();
        let result = file.read_at(u32::MAX, 2);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_empty_read() {
        let file = InMemoryIndexFile::new("mem", b"hello".to_vec()).unwrap();
        assert!(file.read_at(2, 0).unwrap().is_empty());
        assert!(file.read_at(5, 0).unwrap().is_empty());
    }

    #[test]
    fn memory_size_and_name() {
        let file = InMemoryIndexFile::new("shard-0", vec![0; 9]).unwrap();
        assert_eq!(file.size().unwrap(), 9);
        assert_eq!(file.name(), "shard-0");
        assert_eq!(file.data().len(), 9);
    }
}
