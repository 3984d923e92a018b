//! Configuration loading.
//!
//! Settings come from a TOML file and are then overridden by command-line
//! flags. Without `--config`, a `hash-dups.toml` in the current directory is
//! used when present; otherwise the built-in defaults apply.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{DupError, Result};
use crate::scanner::DEFAULT_BLOCK_SIZE;

pub const CONFIG_FILE_NAME: &str = concat!(env!("CARGO_PKG_NAME"), ".toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bytes read per block while hashing.
    pub block_size: NonZeroUsize,
    /// Suppress per-directory progress output.
    pub quiet: bool,
    /// Log at debug level.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            quiet: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Loads `explicit` if given (it must exist), else the default file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DupError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| DupError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// A zero `block_size` is rejected while parsing.
    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e: toml::de::Error| e.message().to_string())
    }

    /// Command-line flags win over file settings.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.quiet {
            self.quiet = true;
        }
        if cli.verbose {
            self.verbose = true;
        }
        if let Some(block_size) = cli.block_size {
            self.block_size = block_size;
        }
    }
}
