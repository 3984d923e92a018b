//! Interactive deletion of redundant copies.
//!
//! Each duplicate group is listed with 0-based member numbers and one line of
//! input selects the member to delete. Nothing is deleted without an explicit,
//! valid selection: blank input skips the group, anything else that is not an
//! in-range number is reported and skipped.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use log::{info, warn};

use crate::duplicates::DuplicateGroup;
use crate::error::{DupError, Result};

/// Outcome counts of one interactive session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveSummary {
    pub deleted: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Parses one line of user input into a member index of a group of `len` members.
///
/// Blank input means "delete nothing" and yields `Ok(None)`.
pub fn parse_selection(input: &str, len: usize) -> Result<Option<usize>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let index: usize = trimmed
        .parse()
        .map_err(|_| DupError::Input(format!("'{trimmed}' is not a member number")))?;
    if index >= len {
        return Err(DupError::Input(format!(
            "{index} is out of range (expected 0 to {})",
            len.saturating_sub(1)
        )));
    }
    Ok(Some(index))
}

/// Another member of `group` that is the same file as member `index`.
///
/// Deleting such a member would remove the only copy, so selections that have
/// one are refused.
pub fn alias_of(group: &DuplicateGroup, index: usize) -> Option<&Path> {
    let selected = fs::canonicalize(group.member(index)?).ok()?;
    group
        .members()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, path)| path.as_path())
        .find(|path| fs::canonicalize(path).is_ok_and(|other| other == selected))
}

/// Removes `path` from the filesystem.
pub fn delete_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| DupError::io(path, e))?;
    info!("Deleted '{}'", path.display());
    Ok(())
}

/// Prompts for one deletion per group, reading selections from `input`.
///
/// Listings and diagnostics go to `output`. End of input stops the session;
/// the remaining groups count as skipped.
pub fn resolve_interactively<R, W>(
    groups: &[DuplicateGroup],
    mut input: R,
    mut output: W,
) -> io::Result<ResolveSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = ResolveSummary::default();

    for (position, group) in groups.iter().enumerate() {
        for (i, path) in group.members().iter().enumerate() {
            writeln!(output, "{i} - {}", path.display())?;
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            summary.skipped += groups.len() - position;
            break;
        }

        match parse_selection(&line, group.len()) {
            Ok(None) => summary.skipped += 1,
            Ok(Some(index)) => {
                let path = &group.members()[index];
                if let Some(alias) = alias_of(group, index) {
                    let e = DupError::Input(format!(
                        "'{}' is the same file as '{}'",
                        path.display(),
                        alias.display()
                    ));
                    warn!("{}", e);
                    writeln!(output, "{}", format!("{e}; nothing deleted").yellow())?;
                    summary.rejected += 1;
                    writeln!(output)?;
                    continue;
                }
                match delete_file(path) {
                    Ok(()) => {
                        writeln!(output, "{}", format!("Deleted '{}'", path.display()).green())?;
                        summary.deleted += 1;
                    }
                    Err(e) => {
                        warn!("{}", e);
                        writeln!(output, "{}", format!("Could not delete: {e}").red())?;
                        summary.failed += 1;
                    }
                }
            }
            Err(e) => {
                writeln!(output, "{}", format!("{e}; nothing deleted").yellow())?;
                summary.rejected += 1;
            }
        }
        writeln!(output)?;
    }

    Ok(summary)
}
