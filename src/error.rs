use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while scanning, hashing or resolving duplicates.
#[derive(Debug, Error)]
pub enum DupError {
    /// A file could not be opened, read or removed.
    #[error("I/O error for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A scan root is missing or is not a directory.
    #[error("invalid scan root '{}': {reason}", .path.display())]
    Path { path: PathBuf, reason: String },

    /// An interactive selection was rejected.
    #[error("invalid selection: {0}")]
    Input(String),

    /// The configuration file could not be loaded or holds invalid values.
    #[error("invalid configuration '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl DupError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn path(path: &Path, reason: impl Into<String>) -> Self {
        Self::Path {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// The path this error is about, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::Path { path, .. } | Self::Config { path, .. } => {
                Some(path.as_path())
            }
            Self::Input(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DupError>;
