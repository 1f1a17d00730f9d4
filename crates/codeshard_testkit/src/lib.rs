//! # Codeshard Testkit
//!
//! Test utilities for codeshard.
//!
//! This crate provides:
//! - Test fixtures: in-memory and on-disk shards, failing sinks
//! - Property-based test generators using proptest
//! - Golden byte vectors for the shard format
//!
//! Cross-crate integration tests live in this crate's `tests/` directory.
//!
//! ## Usage
//!
//! ```rust
//! use codeshard_testkit::prelude::*;
//!
//! let shard = TestShard::build(&scenarios::sample_repository());
//! assert_eq!(shard.document_count(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
