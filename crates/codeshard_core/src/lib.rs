//! # Codeshard Core
//!
//! The on-disk shard format of codeshard.
//!
//! A shard is one immutable file holding the documents of a repository
//! snapshot. It is laid out as a run of sections followed by a table of
//! contents (TOC) and an 8-byte descriptor locating the TOC.
//!
//! This crate provides:
//! - [`ShardWriter`] - offset-tracking output with a sticky error
//! - [`SimpleSection`], [`CompoundSection`], [`ContentSection`] - section
//!   descriptors and their payload layout
//! - [`ShardBuilder`] - accumulates documents and writes a shard
//! - [`Shard`] - opens a shard for random-access reads
//!
//! ## Example
//!
//! ```rust
//! use codeshard_core::{Document, Shard, ShardBuilder};
//! use codeshard_storage::InMemoryIndexFile;
//! use std::sync::Arc;
//!
//! let mut builder = ShardBuilder::default();
//! builder.add(Document::new("README.md", "Hello\nWorld\n").with_branch("main")).unwrap();
//! let (bytes, _stats) = builder.finish(Vec::new()).unwrap();
//!
//! let file = InMemoryIndexFile::new("demo", bytes).unwrap();
//! let shard = Shard::open(Arc::new(file)).unwrap();
//! assert_eq!(shard.content(0).unwrap(), b"Hello\nWorld\n");
//! assert_eq!(shard.folded_content(0).unwrap(), b"hello\nworld\n");
//! assert_eq!(shard.newlines(0).unwrap(), vec![5, 11]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
pub mod case;
mod config;
mod error;
mod index_data;
mod reader;
pub mod section;
mod shard;
pub mod toc;
mod writer;

pub use builder::{AddOutcome, BuildStats, Document, ShardBuilder};
pub use case::SearchableString;
pub use config::{BuilderConfig, MAX_BRANCHES};
pub use error::{CoreError, CoreResult, WriteError, WriteResult};
pub use index_data::IndexData;
pub use reader::ByteReader;
pub use section::{CompoundSection, ContentSection, Section, SimpleSection};
pub use shard::Shard;
pub use toc::{ShardMetadata, Toc, TocEntry, FORMAT_VERSION};
pub use writer::ShardWriter;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
