//! Codeshard CLI
//!
//! Command-line tools for codeshard index shards.
//!
//! # Commands
//!
//! - `build` - Build a shard from files on disk
//! - `inspect` - Display the section table of a shard
//! - `verify` - Read back every document of a shard
//! - `dump` - Print one document of a shard

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Codeshard command-line shard tools.
#[derive(Parser)]
#[command(name = "codeshard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a shard from files on disk
    Build {
        /// Path of the shard file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Branch the files belong to (repeatable)
        #[arg(short, long = "branch")]
        branches: Vec<String>,

        /// Sub-repository path recorded for every file
        #[arg(long, default_value = "")]
        sub_repo: String,

        /// Skip files larger than this many bytes
        #[arg(long)]
        size_max: Option<usize>,

        /// Start a new shard once this many content bytes are stored
        #[arg(long)]
        shard_max: Option<usize>,

        /// Files to index
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Display the section table of a shard
    Inspect {
        /// Shard file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify a shard by reading back every document
    Verify {
        /// Shard file
        file: PathBuf,
    },

    /// Print one document of a shard
    Dump {
        /// Shard file
        file: PathBuf,

        /// Document number
        doc: usize,

        /// Also print newline offsets and case-folded content
        #[arg(short, long)]
        details: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            output,
            branches,
            sub_repo,
            size_max,
            shard_max,
            files,
        } => {
            let options = commands::build::BuildOptions {
                branches,
                sub_repo,
                size_max,
                shard_max,
            };
            commands::build::run(&output, &files, &options)?;
        }
        Commands::Inspect { file, format } => {
            commands::inspect::run(&file, &format)?;
        }
        Commands::Verify { file } => {
            commands::verify::run(&file)?;
        }
        Commands::Dump { file, doc, details } => {
            commands::dump::run(&file, doc, details)?;
        }
        Commands::Version => {
            println!("Codeshard CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Codeshard Core v{}", codeshard_core::VERSION);
            println!("Shard format v{}", codeshard_core::FORMAT_VERSION);
        }
    }

    Ok(())
}
