//! Dump command implementation.

use std::io::Write;
use std::path::Path;

/// Runs the dump command.
pub fn run(path: &Path, doc: usize, details: bool) -> Result<(), Box<dyn std::error::Error>> {
    let shard = super::open_shard(path)?;
    let document = shard.document(doc)?;

    println!("Document {doc} of {}", shard.document_count());
    println!("  Name:     {}", document.name);
    println!("  Size:     {} bytes", document.content.len());
    println!("  Branches: {}", document.branches.join(", "));
    if !document.sub_repository_path.is_empty() {
        println!("  Sub-repo: {}", document.sub_repository_path);
    }
    if details {
        println!("  Newlines: {:?}", shard.newlines(doc)?);
        println!("  Folded:");
        print_content(&shard.folded_content(doc)?)?;
    }
    println!();
    print_content(&document.content)?;
    Ok(())
}

fn print_content(content: &[u8]) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(content)?;
    if !content.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()
}
