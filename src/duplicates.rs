use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indicatif::HumanCount;
use log::{info, warn};

use crate::utils::Fingerprint;

/// Paths sharing one fingerprint, ordered by path.
pub type FileGroup = BTreeSet<PathBuf>;

/// Mapping from fingerprint to every path that produced it.
///
/// A path belongs to at most one group. Entries only grow while a scan runs;
/// [`narrow_to`](Self::narrow_to) is the one exception and is applied once the
/// walk has finished.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupIndex {
    groups: BTreeMap<Fingerprint, FileGroup>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path` to the group for `hash`. Returns false if it was already there.
    pub fn insert(&mut self, hash: Fingerprint, path: PathBuf) -> bool {
        self.groups.entry(hash).or_default().insert(path)
    }

    pub fn get(&self, hash: &Fingerprint) -> Option<&FileGroup> {
        self.groups.get(hash)
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of paths across all groups.
    pub fn total_files(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    pub fn fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &FileGroup)> {
        self.groups.iter()
    }

    /// Drops every group except the one for `hash`, which is kept even when empty.
    pub fn narrow_to(&mut self, hash: Fingerprint) {
        let group = self.groups.remove(&hash).unwrap_or_default();
        self.groups.clear();
        self.groups.insert(hash, group);
    }

    /// Groups with more than one member, ordered by fingerprint.
    pub fn duplicates(&self) -> Vec<DuplicateGroup> {
        self.groups
            .iter()
            .filter(|(_, group)| group.len() > 1)
            .map(|(hash, group)| DuplicateGroup::new(*hash, group.iter().cloned().collect()))
            .collect()
    }
}

/// A reported set of identical files with a stable, index-addressable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub fingerprint: Fingerprint,
    members: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Members are sorted lexicographically by path and deduplicated.
    pub fn new(fingerprint: Fingerprint, mut members: Vec<PathBuf>) -> Self {
        members.sort();
        members.dedup();
        Self {
            fingerprint,
            members,
        }
    }

    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&Path> {
        self.members.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Renders duplicate groups as an indented `{fingerprint: {path, ...}}` dump.
///
/// The same text goes to standard output and to `--output` files.
pub fn render(duplicates: &[DuplicateGroup]) -> String {
    let dump: BTreeMap<String, BTreeSet<String>> = duplicates
        .iter()
        .map(|group| {
            let paths = group
                .members()
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            (group.fingerprint.to_hex(), paths)
        })
        .collect();
    format!("{dump:#?}")
}

/// Writes the rendered groups to `output_file`, or to `stdout` when there is none.
///
/// Both destinations get the same text. The group count is only appended on
/// `stdout`, and only when `show_count` is set.
pub fn write_report<W: Write>(
    duplicates: &[DuplicateGroup],
    output_file: Option<&Path>,
    show_count: bool,
    mut stdout: W,
) -> io::Result<()> {
    let rendered = render(duplicates);
    match output_file {
        Some(file_name) => {
            fs::write(file_name, format!("{rendered}\n"))?;
            info!("Duplicate listing written to '{}'", file_name.display());
        }
        None => {
            writeln!(stdout, "{rendered}")?;
            if show_count {
                writeln!(stdout, "{}", duplicates.len())?;
            }
        }
    }
    Ok(())
}

pub fn log_summary(duplicates: &[DuplicateGroup]) {
    if duplicates.is_empty() {
        info!("No duplicate files found");
        return;
    }
    let redundant: usize = duplicates.iter().map(|group| group.len() - 1).sum();
    warn!(
        "Found {} duplicate groups with {} redundant files",
        HumanCount(duplicates.len() as u64),
        HumanCount(redundant as u64)
    );
}
