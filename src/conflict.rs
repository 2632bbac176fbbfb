//! Conflict resolution.
//!
//! Policy:
//! - Skip: never touch an existing destination.
//! - Overwrite: use the requested name; the engine takes a safety copy first
//!   when backups are enabled.
//! - Rename: lowest unused numeric suffix (`name_1.ext`, `name_2.ext`, ...).
//! - Ask: consult an interactive capability; only available during scanning.
//!
//! Resolution is deterministic: the same policy and filesystem state always
//! produce the same decision.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::backup::split_file_name;
use crate::errors::OrganizeError;
use crate::plan::{ResolvedAction, SkipReason};

/// Run-wide conflict policy. Selected once; immutable for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    #[default]
    Skip,
    Overwrite,
    Rename,
    Ask,
}

impl ConflictPolicy {
    /// Parse common string names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Some(ConflictPolicy::Skip),
            "overwrite" => Some(ConflictPolicy::Overwrite),
            "rename" => Some(ConflictPolicy::Rename),
            "ask" => Some(ConflictPolicy::Ask),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Overwrite => "overwrite",
            ConflictPolicy::Rename => "rename",
            ConflictPolicy::Ask => "ask",
        }
    }
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid conflict policy: '{s}'"))
    }
}

/// Interactive capability consulted by the scanner under the Ask policy.
pub trait Prompt {
    /// Ask whether `dest` may be overwritten. Returning false skips the file.
    fn confirm_overwrite(&mut self, dest: &Path) -> io::Result<bool>;
}

/// Reads y/N answers from stdin; used by the CLI during the scan phase.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm_overwrite(&mut self, dest: &Path) -> io::Result<bool> {
        eprint!("Overwrite '{}'? [y/N] ", dest.display());
        io::stderr().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// True when something (file, dir, even a dangling symlink) occupies `path`.
pub fn path_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Scan-phase resolution for a planned destination.
///
/// With the Ask policy and no prompt supplied the entry is marked
/// `PromptRequired`; the engine later downgrades it to a skip because no
/// interactive capability exists at execution time.
pub fn resolve(
    policy: ConflictPolicy,
    destination: &Path,
    exists: bool,
    prompt: Option<&mut (dyn Prompt + '_)>,
) -> Result<ResolvedAction, OrganizeError> {
    if !exists {
        return Ok(ResolvedAction::Move);
    }
    match policy {
        ConflictPolicy::Skip => Ok(ResolvedAction::Skip(SkipReason::AlreadyExists)),
        ConflictPolicy::Overwrite => Ok(ResolvedAction::Overwrite),
        ConflictPolicy::Rename => Ok(ResolvedAction::RenameWithSuffix(lowest_free_suffix(
            destination,
            path_occupied,
        ))),
        ConflictPolicy::Ask => match prompt {
            Some(p) => {
                let yes =
                    p.confirm_overwrite(destination)
                        .map_err(|e| OrganizeError::Filesystem {
                            op: "read prompt answer for",
                            path: destination.to_path_buf(),
                            source: e,
                        })?;
                if yes {
                    Ok(ResolvedAction::Overwrite)
                } else {
                    Ok(ResolvedAction::Skip(SkipReason::Declined))
                }
            }
            None => Ok(ResolvedAction::PromptRequired),
        },
    }
}

/// Lowest n >= 1 such that the suffixed path is unused according to
/// `occupied`. The predicate is injected so the scanner can also count
/// destinations claimed earlier in the same plan.
pub fn lowest_free_suffix<F>(destination: &Path, occupied: F) -> u32
where
    F: Fn(&Path) -> bool,
{
    let mut n = 1u32;
    while occupied(&suffixed_destination(destination, n)) {
        n += 1;
    }
    n
}

/// `<dir>/<stem>_<n>.<ext>`; multi-part extensions stay a single unit, so
/// `archive.tar.gz` becomes `archive_1.tar.gz`.
pub fn suffixed_destination(destination: &Path, n: u32) -> PathBuf {
    let name = destination
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("file"));
    let (stem, ext) = split_file_name(name);

    let mut new_name = stem;
    new_name.push(format!("_{n}"));
    if let Some(ext) = ext {
        new_name.push(".");
        new_name.push(&ext);
    }
    destination.with_file_name(new_name)
}
