use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "hash-dups", version)]
#[command(about = "Find duplicate files by content hash and optionally delete redundant copies")]
pub struct Cli {
    /// Directories to scan for duplicates
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Do not print each directory as it is scanned
    #[arg(short, long)]
    pub quiet: bool,

    /// Write the duplicate listing to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only report files identical to this one
    #[arg(short, long, value_name = "PATH")]
    pub like: Option<PathBuf>,

    /// Also print the number of duplicate groups
    #[arg(short, long)]
    pub size: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Bytes read per block while hashing (default: 65536)
    #[arg(short, long, value_name = "BYTES")]
    pub block_size: Option<NonZeroUsize>,

    /// Configuration file (default: ./hash-dups.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip the interactive deletion prompt
    #[arg(short = 'n', long)]
    pub no_interactive: bool,
}
