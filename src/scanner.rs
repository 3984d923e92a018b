use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use indicatif::HumanCount;
use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::cache::HashCache;
use crate::duplicates::GroupIndex;
use crate::error::{DupError, Result};
use crate::progress::ScanProgress;
use crate::utils::Fingerprint;

/// Read size used when hashing files.
pub const DEFAULT_BLOCK_SIZE: NonZeroUsize = NonZeroUsize::new(64 * 1024).unwrap();

/// Fingerprint of an in-memory byte slice.
///
/// Equal to the fingerprint [`FileHasher::hash`] computes for a file holding
/// exactly these bytes, whatever the block size.
pub fn hash_bytes(data: &[u8]) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(data);
    Fingerprint::from_hasher(&hasher)
}

/// Streams files through BLAKE3 in fixed-size blocks, memoizing by path.
#[derive(Debug)]
pub struct FileHasher {
    block_size: NonZeroUsize,
    cache: HashCache,
    files_read: u64,
    bytes_read: u64,
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl FileHasher {
    pub fn new(block_size: NonZeroUsize) -> Self {
        Self {
            block_size,
            cache: HashCache::new(),
            files_read: 0,
            bytes_read: 0,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size.get()
    }

    /// Number of files actually read from disk (cache hits excluded).
    pub fn files_read(&self) -> u64 {
        self.files_read
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn cache(&self) -> &HashCache {
        &self.cache
    }

    /// Returns the content fingerprint of `file_path`.
    ///
    /// A path hashed earlier in this run is answered from the cache without
    /// touching the file again.
    pub fn hash(&mut self, file_path: &Path) -> Result<Fingerprint> {
        if let Some(cached) = self.cache.get_hash(file_path) {
            debug!("Cache hit for '{}'", file_path.display());
            return Ok(cached);
        }

        let hash = self.calculate_file_hash(file_path)?;
        self.cache.set_hash(file_path, hash);
        Ok(hash)
    }

    fn calculate_file_hash(&mut self, file_path: &Path) -> Result<Fingerprint> {
        debug!("Calculating hash for: '{}'", file_path.display());

        let mut file = fs::File::open(file_path).map_err(|e| DupError::io(file_path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0; self.block_size.get()];
        let mut total_bytes = 0u64;

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DupError::io(file_path, e)),
            };
            hasher.update(&buffer[..bytes_read]);
            total_bytes += bytes_read as u64;
        }

        let hash = Fingerprint::from_hasher(&hasher);
        debug!("Hash calculated for '{}': {} ({} bytes)", file_path.display(), hash, total_bytes);

        self.files_read += 1;
        self.bytes_read += total_bytes;
        Ok(hash)
    }
}

/// Counters collected while walking the scan roots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub directories: u64,
    pub files_hashed: u64,
    pub files_skipped: u64,
    pub entries_unreadable: u64,
    /// Files reached again through another spelling of an already grouped path.
    pub aliases: u64,
}

/// Records each file once, whichever path spelling reaches it first.
///
/// Identity is the canonical path, so `d/c.txt`, `./d/c.txt` and a symlink to
/// it are one file. The spelling that was seen first is the one grouped.
#[derive(Debug, Default)]
struct Accumulator {
    index: GroupIndex,
    seen: HashSet<PathBuf>,
}

impl Accumulator {
    fn record(&mut self, hash: Fingerprint, path: &Path) -> bool {
        let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !self.seen.insert(identity) {
            debug!("Already grouped under another path: '{}'", path.display());
            return false;
        }
        self.index.insert(hash, path.to_path_buf())
    }
}

/// Groups every file under `roots` by content fingerprint.
///
/// See [`group_files_with_stats`].
pub fn group_files(
    roots: &[PathBuf],
    reference: Option<&Path>,
    hasher: &mut FileHasher,
    progress: &ScanProgress,
) -> Result<GroupIndex> {
    group_files_with_stats(roots, reference, hasher, progress).map(|(index, _)| index)
}

/// Walks each root recursively and groups every regular file by fingerprint.
///
/// Every root must be an existing directory, otherwise nothing is scanned and
/// a [`DupError::Path`] is returned. Files that cannot be hashed are logged
/// and skipped. A file reached through several paths (overlapping roots,
/// symlinks, `..` spellings) is grouped once.
///
/// When `reference` is given it is hashed before the walk and seeded into the
/// index, and the returned index holds only the reference's group.
pub fn group_files_with_stats(
    roots: &[PathBuf],
    reference: Option<&Path>,
    hasher: &mut FileHasher,
    progress: &ScanProgress,
) -> Result<(GroupIndex, ScanStats)> {
    for root in roots {
        validate_root(root)?;
    }

    let mut acc = Accumulator::default();
    let reference_hash = match reference {
        Some(path) => {
            let hash = hasher.hash(path)?;
            info!("Looking for files like '{}' ({})", path.display(), hash);
            acc.record(hash, path);
            Some(hash)
        }
        None => None,
    };

    let mut stats = ScanStats::default();
    for root in roots {
        scan_root(root, hasher, &mut acc, progress, &mut stats);
    }
    progress.finish();
    let mut index = acc.index;

    info!(
        "Scan complete: {} directories, {} files hashed, {} skipped, {} distinct contents",
        HumanCount(stats.directories),
        HumanCount(stats.files_hashed),
        HumanCount(stats.files_skipped + stats.entries_unreadable),
        HumanCount(index.len() as u64)
    );

    if let Some(hash) = reference_hash {
        index.narrow_to(hash);
    }
    Ok((index, stats))
}

fn validate_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|e| DupError::path(root, e.to_string()))?;
    if !metadata.is_dir() {
        return Err(DupError::path(root, "not a directory"));
    }
    Ok(())
}

fn scan_root(
    root: &Path,
    hasher: &mut FileHasher,
    acc: &mut Accumulator,
    progress: &ScanProgress,
    stats: &mut ScanStats,
) {
    info!("Scanning {}", root.display());

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under '{}': {}", root.display(), e);
                stats.entries_unreadable += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            stats.directories += 1;
            progress.enter_directory(entry.path());
            continue;
        }
        if !is_hashable(&entry) {
            debug!("Skipping non-regular file: '{}'", entry.path().display());
            continue;
        }

        let path = entry.path();
        match hasher.hash(path) {
            Ok(hash) => {
                if !acc.record(hash, path) {
                    stats.aliases += 1;
                    continue;
                }
                stats.files_hashed += 1;
                progress.file_hashed(stats.files_hashed);
            }
            Err(e) => {
                warn!("Skipping file: {}", e);
                stats.files_skipped += 1;
            }
        }
    }
}

/// Regular files, and symlinks that do not point at a directory or special
/// file. Dangling links are kept so the hasher reports them.
fn is_hashable(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if file_type.is_symlink() {
        return match fs::metadata(entry.path()) {
            Ok(metadata) => metadata.is_file(),
            Err(_) => true,
        };
    }
    false
}
