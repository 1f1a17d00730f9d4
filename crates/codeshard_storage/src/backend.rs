//! Random-access index file trait.

use crate::error::{StorageError, StorageResult};

/// Read-only, random-access view of a finished index file.
///
/// Offsets are 32-bit: a shard never exceeds `u32::MAX` bytes.
///
/// # Invariants
///
/// - `read_at` returns exactly `len` bytes starting at `offset`, or fails
/// - a range extending past `size()` is an error, never a short read
/// - implementations are `Send + Sync`; reads never mutate the file, so any
///   number of readers may share one instance
///
/// # Implementors
///
/// - [`super::InMemoryIndexFile`] - For tests and freshly built shards
/// - [`super::FileIndexFile`] - For shards on disk
pub trait IndexFile: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The range extends beyond the file size
    /// - An I/O error occurs
    fn read_at(&self, offset: u32, len: u32) -> StorageResult<Vec<u8>>;

    /// Returns the size of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u32>;

    /// Returns a human-readable name for diagnostics.
    fn name(&self) -> &str;
}

/// Checks that `[offset, offset + len)` lies within `size`.
pub(crate) fn check_range(name: &str, offset: u32, len: u32, size: u32) -> StorageResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(StorageError::ReadPastEnd {
            name: name.to_string(),
            offset,
            len,
            size,
        }),
    }
}
