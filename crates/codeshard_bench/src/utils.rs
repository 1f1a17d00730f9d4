//! Benchmark utilities.

use codeshard_core::Document;
use rand::Rng;

const TOKENS: [&str; 12] = [
    "fn", "let", "mut", "Self", "impl", "return", "Result", "Vec", "String", "match", "Some",
    "None",
];

/// Generate source-like text of roughly `size` bytes with a newline every
/// few tokens.
pub fn random_source(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut out = Vec::with_capacity(size + 16);
    while out.len() < size {
        out.extend_from_slice(TOKENS[rng.gen_range(0..TOKENS.len())].as_bytes());
        out.push(if rng.gen_ratio(1, 6) { b'\n' } else { b' ' });
    }
    out.truncate(size);
    out
}

/// Generate sorted offsets with gaps below `max_gap`.
pub fn random_offsets(count: usize, max_gap: u32) -> Vec<u32> {
    let mut rng = rand::thread_rng();
    let mut at = 0u32;
    (0..count)
        .map(|_| {
            at += rng.gen_range(0..max_gap);
            at
        })
        .collect()
}

/// Generate documents of `size` content bytes spread over three branches.
pub fn generate_documents(count: usize, size: usize) -> Vec<Document> {
    const BRANCHES: [&str; 3] = ["main", "dev", "release"];
    (0..count)
        .map(|i| {
            Document::new(format!("src/module_{}/File{i}.rs", i % 16), random_source(size))
                .with_branch(BRANCHES[i % BRANCHES.len()])
        })
        .collect()
}
