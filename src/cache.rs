use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::utils::Fingerprint;

/// Per-run memo of file fingerprints keyed by path.
///
/// Entries are never invalidated: a file deleted and recreated under the same
/// path during one run keeps its first fingerprint. The cache lives only as
/// long as the [`FileHasher`](crate::scanner::FileHasher) that owns it and is
/// never written to disk.
#[derive(Debug, Default)]
pub struct HashCache {
    cache: HashMap<PathBuf, Fingerprint>,
}

impl HashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fingerprint previously recorded for `file_path`, if any.
    pub fn get_hash(&self, file_path: &Path) -> Option<Fingerprint> {
        self.cache.get(file_path).copied()
    }

    /// Records the fingerprint for `file_path`, replacing any earlier entry.
    pub fn set_hash(&mut self, file_path: &Path, hash: Fingerprint) {
        self.cache.insert(file_path.to_path_buf(), hash);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
