//! Safety copies and retention.
//! Creates timestamped sibling copies before destructive overwrites and
//! prunes old ones. The filename splitter here treats compound `.tar.*`
//! extensions as a single unit and is shared with rename-suffix generation
//! so both produce consistent names.

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::fs_ops::safe_copy_and_rename;

const BACKUP_MARKER: &str = ".bak-";

/// Receipt for a created safety copy.
#[derive(Debug, Clone)]
pub struct BackupHandle {
    pub original: PathBuf,
    pub backup_path: PathBuf,
    pub created_at: SystemTime,
}

/// Split a file name into stem and extension, keeping multi-part
/// `.tar.<comp>` extensions whole: `archive.tar.gz` -> (`archive`, `tar.gz`).
/// Dotfiles like `.env` keep the leading dot in the stem.
pub fn split_file_name(name: &OsStr) -> (OsString, Option<OsString>) {
    if let Some(s) = name.to_str() {
        if let Some(idx) = s.rfind('.').filter(|&i| i > 0 && i + 1 < s.len()) {
            let (stem, ext) = (&s[..idx], &s[idx + 1..]);
            if let Some(short) = stem.strip_suffix(".tar") {
                if !short.is_empty() {
                    return (short.into(), Some(format!("tar.{ext}").into()));
                }
            }
            return (stem.into(), Some(ext.into()));
        }
        return (s.into(), None);
    }

    // Non-UTF8 names: fall back to the std splitter (no compound detection).
    let p = Path::new(name);
    let stem = p
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    (stem, p.extension().map(|e| e.to_os_string()))
}

/// Create a safety copy of `path` next to it, named
/// `<stem>.bak-<YYYYMMDDHHMMSS>.<ext>`. Uses the durable copy+rename
/// discipline, so a crash never leaves a half-written backup under the
/// final name.
pub fn create_safety_copy(path: &Path) -> Result<BackupHandle> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("backup target has no file name: {}", path.display()))?;
    let (stem, ext) = split_file_name(name);
    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();

    // Same-second collisions get a small counter appended.
    let mut n = 0u32;
    let backup_path = loop {
        let mut bname = stem.clone();
        bname.push(BACKUP_MARKER);
        bname.push(&stamp);
        if n > 0 {
            bname.push(format!("_{n}"));
        }
        if let Some(ref ext) = ext {
            bname.push(".");
            bname.push(ext);
        }
        let candidate = path.with_file_name(&bname);
        if candidate.symlink_metadata().is_err() {
            break candidate;
        }
        n += 1;
    };

    safe_copy_and_rename(path, &backup_path)
        .with_context(|| format!("create safety copy of '{}'", path.display()))?;
    info!(original = %path.display(), backup = %backup_path.display(), "Created safety copy");

    Ok(BackupHandle {
        original: path.to_path_buf(),
        backup_path,
        created_at: SystemTime::now(),
    })
}

/// Delete the oldest safety copies of `original` beyond `keep`. Backup names
/// embed a sortable timestamp, so lexicographic order is age order. Returns
/// the number of copies removed.
pub fn prune_backups(original: &Path, keep: usize) -> Result<usize> {
    let dir = match original.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = original
        .file_name()
        .ok_or_else(|| anyhow!("backup target has no file name: {}", original.display()))?;
    let (stem, ext) = split_file_name(name);

    let mut prefix = stem;
    prefix.push(BACKUP_MARKER);
    let prefix = prefix.to_string_lossy().into_owned();
    let suffix = ext.map(|e| format!(".{}", e.to_string_lossy()));

    let mut backups: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read backup directory '{}'", dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let fname = e.file_name();
            let fname = fname.to_string_lossy();
            fname.starts_with(&prefix)
                && suffix.as_deref().is_none_or(|s| fname.ends_with(s))
        })
        .map(|e| e.path())
        .collect();

    backups.sort();
    let excess = backups.len().saturating_sub(keep);
    for old in &backups[..excess] {
        fs::remove_file(old)
            .with_context(|| format!("remove old safety copy '{}'", old.display()))?;
        debug!(path = %old.display(), "Pruned old safety copy");
    }
    Ok(excess)
}
