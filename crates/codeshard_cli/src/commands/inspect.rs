//! Inspect command implementation.

use codeshard_core::{Shard, TocEntry};
use codeshard_storage::IndexFile;
use serde::Serialize;
use std::path::Path;

/// Shard inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Shard path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u32,
    /// Format version.
    pub format_version: u32,
    /// Number of documents.
    pub document_count: u32,
    /// Branch names in bit order.
    pub branches: Vec<String>,
    /// Sub-repository paths; the first is the root.
    pub sub_repositories: Vec<String>,
    /// One row per TOC descriptor.
    pub sections: Vec<SectionInfo>,
}

/// One row of the section table.
#[derive(Debug, Serialize)]
pub struct SectionInfo {
    /// Section name.
    pub name: &'static str,
    /// Section kind (simple, compound).
    pub kind: &'static str,
    /// Payload offset.
    pub offset: u32,
    /// Payload length.
    pub length: u32,
    /// Offset table length, compound sections only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_length: Option<u32>,
    /// Item count, compound sections only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
}

impl From<TocEntry> for SectionInfo {
    fn from(entry: TocEntry) -> Self {
        match entry {
            TocEntry::Simple { name, section } => Self {
                name,
                kind: "simple",
                offset: section.offset,
                length: section.length,
                index_length: None,
                items: None,
            },
            TocEntry::Compound {
                name,
                data,
                index,
                items,
            } => Self {
                name,
                kind: "compound",
                offset: data.offset,
                length: data.length,
                index_length: Some(index.length),
                items: Some(items),
            },
        }
    }
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let shard = super::open_shard(path)?;
    let result = inspect(path, &shard)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Collects the inspection result for an open shard.
pub fn inspect(path: &Path, shard: &Shard) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let metadata = shard.metadata();
    Ok(InspectResult {
        path: path.display().to_string(),
        file_size: shard.index_data().file().size()?,
        format_version: metadata.format_version,
        document_count: metadata.document_count,
        branches: shard.branches().to_vec(),
        sub_repositories: shard.sub_repositories().to_vec(),
        sections: shard.toc().entries().into_iter().map(SectionInfo::from).collect(),
    })
}

fn print_text_output(result: &InspectResult) {
    println!("Codeshard Shard Inspection");
    println!("==========================");
    println!();
    println!("Path:      {}", result.path);
    println!("Size:      {}", format_size(u64::from(result.file_size)));
    println!("Format:    v{}", result.format_version);
    println!("Documents: {}", result.document_count);
    println!();
    println!("Branches:");
    for (bit, name) in result.branches.iter().enumerate() {
        println!("  [{bit}] {name}");
    }
    println!();
    println!("Sub-repositories:");
    for (id, path) in result.sub_repositories.iter().enumerate() {
        let shown = if path.is_empty() { "(root)" } else { path.as_str() };
        println!("  [{id}] {shown}");
    }
    println!();
    println!("Sections:");
    println!(
        "  {:<20} {:<9} {:>10} {:>10} {:>10} {:>7}",
        "name", "kind", "offset", "length", "index", "items"
    );
    for s in &result.sections {
        println!(
            "  {:<20} {:<9} {:>10} {:>10} {:>10} {:>7}",
            s.name,
            s.kind,
            s.offset,
            s.length,
            s.index_length.map_or_else(|| "-".to_string(), |n| n.to_string()),
            s.items.map_or_else(|| "-".to_string(), |n| n.to_string()),
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
