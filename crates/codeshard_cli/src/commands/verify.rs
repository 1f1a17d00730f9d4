//! Verify command implementation.

use codeshard_core::Shard;
use std::path::Path;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of documents checked.
    pub documents_checked: usize,
    /// Number of documents read back intact.
    pub valid_documents: usize,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying shard at {:?}", path);
    println!();

    let shard = match super::open_shard(path) {
        Ok(shard) => shard,
        Err(e) => {
            println!("✗ Shard could not be opened: {e}");
            return Err("Verification failed".into());
        }
    };

    let result = verify_documents(&shard);
    println!("Documents checked: {}", result.documents_checked);
    println!("Valid documents:   {}", result.valid_documents);
    for error in &result.errors {
        println!("  - {error}");
    }

    println!();
    if result.is_ok() {
        println!("✓ Shard verification passed");
        Ok(())
    } else {
        println!("✗ Shard verification failed");
        Err("Verification failed".into())
    }
}

/// Reads every document back and checks the per-document invariants.
pub fn verify_documents(shard: &Shard) -> VerifyResult {
    let mut result = VerifyResult::default();
    let mut newlines = Vec::new();

    for i in 0..shard.document_count() {
        result.documents_checked += 1;
        match verify_document(shard, i, &mut newlines) {
            Ok(()) => result.valid_documents += 1,
            Err(e) => result.errors.push(format!("document {i}: {e}")),
        }
    }

    result
}

fn verify_document(
    shard: &Shard,
    i: usize,
    newlines: &mut Vec<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = shard.document(i)?;
    let folded = shard.folded_content(i)?;
    if folded != doc.content.to_ascii_lowercase() {
        return Err("folded content does not match original".into());
    }

    shard.newlines_into(i, newlines)?;
    let expected = doc.content.iter().filter(|&&b| b == b'\n').count();
    if newlines.len() != expected {
        return Err(format!("{} newline offsets for {expected} newlines", newlines.len()).into());
    }
    if let Some(&bad) = newlines
        .iter()
        .find(|&&at| doc.content.get(at as usize) != Some(&b'\n'))
    {
        return Err(format!("newline offset {bad} does not point at a newline").into());
    }
    Ok(())
}
