//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use codeshard_core::Document;
use proptest::prelude::*;

/// Strategy for generating source-like text: mixed case, digits,
/// punctuation, newlines and the occasional non-ASCII byte.
pub fn source_text_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => prop::sample::select(b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 _(){};".to_vec()),
            2 => Just(b'\n'),
            1 => any::<u8>(),
        ],
        0..512,
    )
}

/// Strategy for generating file paths.
pub fn path_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,11}(/[a-zA-Z0-9_.]{1,12}){0,3}")
        .expect("Invalid regex")
}

/// Strategy for generating branch names.
pub fn branch_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,15}").expect("Invalid regex")
}

/// Strategy for generating a non-decreasing sequence of offsets.
pub fn ascending_offsets_strategy(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..1 << 20, 0..max_len).prop_map(|mut values| {
        values.sort_unstable();
        values
    })
}

/// Strategy for generating a document on up to three branches from a
/// small fixed pool.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    (
        path_strategy(),
        source_text_strategy(),
        prop::sample::subsequence(vec!["main", "dev", "release", "v1.0"], 0..=3),
        prop::sample::select(vec!["", "", "", "third_party/lib"]),
    )
        .prop_map(|(name, content, branches, sub_repo)| Document {
            name,
            content,
            branches: branches.into_iter().map(String::from).collect(),
            sub_repository_path: sub_repo.to_string(),
        })
}

/// Strategy for generating a batch of documents.
pub fn document_batch_strategy(
    min_docs: usize,
    max_docs: usize,
) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(document_strategy(), min_docs..max_docs)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn path_is_valid(path in path_strategy()) {
            prop_assert!(!path.is_empty());
            prop_assert!(!path.ends_with('/'));
        }

        #[test]
        fn offsets_are_sorted(values in ascending_offsets_strategy(64)) {
            prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn documents_use_known_branches(doc in document_strategy()) {
            prop_assert!(doc.branches.len() <= 3);
            prop_assert!(!doc.name.is_empty());
        }
    }
}
