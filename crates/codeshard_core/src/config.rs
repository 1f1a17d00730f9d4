//! Shard builder configuration.

/// Largest number of branches a shard can record; branch sets are `u64` masks.
pub const MAX_BRANCHES: usize = 64;

/// Configuration for building a shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Documents with more content bytes than this are skipped.
    pub size_max: usize,

    /// Accumulated content size at which the shard reports itself full.
    pub shard_max: usize,

    /// Maximum number of distinct branch names per shard.
    pub max_branches: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            size_max: 2 * 1024 * 1024,   // 2 MB
            shard_max: 100 * 1024 * 1024, // 100 MB
            max_branches: MAX_BRANCHES,
        }
    }
}

impl BuilderConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-document size limit, clamped to `u32::MAX`.
    ///
    /// Newline positions are stored as `u32`, so no larger document fits.
    #[must_use]
    pub const fn size_max(mut self, size: usize) -> Self {
        self.size_max = if size > u32::MAX as usize {
            u32::MAX as usize
        } else {
            size
        };
        self
    }

    /// Sets the soft shard size limit.
    #[must_use]
    pub const fn shard_max(mut self, size: usize) -> Self {
        self.shard_max = size;
        self
    }

    /// Sets the branch limit, clamped to [`MAX_BRANCHES`].
    #[must_use]
    pub const fn max_branches(mut self, count: usize) -> Self {
        self.max_branches = if count > MAX_BRANCHES {
            MAX_BRANCHES
        } else {
            count
        };
        self
    }
}
