//! # Codeshard Storage
//!
//! The storage boundary of the codeshard index format.
//!
//! Shards are written sequentially once and then served read-only through
//! random-access reads. This crate provides both sides of that boundary
//! without interpreting the bytes:
//!
//! - [`IndexFile`] - random-access reads of a finished shard
//! - [`InMemoryIndexFile`] - for tests and freshly built shards
//! - [`FileIndexFile`] - reads ranges from a file on disk
//! - [`PendingFile`] - writes a new shard next to its destination and
//!   publishes it atomically
//!
//! ## Example
//!
//! ```rust
//! use codeshard_storage::{IndexFile, InMemoryIndexFile};
//!
//! let file = InMemoryIndexFile::new("demo", b"hello world".to_vec()).unwrap();
//! assert_eq!(&file.read_at(0, 5).unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod pending;

pub use backend::IndexFile;
pub use error::{StorageError, StorageResult};
pub use file::FileIndexFile;
pub use memory::InMemoryIndexFile;
pub use pending::PendingFile;
