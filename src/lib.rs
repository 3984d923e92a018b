pub mod cli;
pub mod cache;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod resolve;
pub mod scanner;
pub mod utils;

pub use cli::Cli;
pub use cache::HashCache;
pub use config::Config;
pub use duplicates::{DuplicateGroup, FileGroup, GroupIndex, log_summary, render, write_report};
pub use error::{DupError, Result};
pub use progress::ScanProgress;
pub use resolve::{ResolveSummary, alias_of, delete_file, parse_selection, resolve_interactively};
pub use scanner::{DEFAULT_BLOCK_SIZE, FileHasher, ScanStats, group_files, group_files_with_stats, hash_bytes};
pub use utils::{Fingerprint, format_human_elapsed};
