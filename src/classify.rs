//! Destination path classification.
//! Maps a file's modification time to its date bucket and resolves the real
//! (symlink-free) directory where that bucket must be created.

use chrono::{DateTime, Datelike, Local};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::OrganizeError;

/// Computed destination for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePath {
    /// `YYYY/YYYYMM/YYYYMMDD` below the destination root. Exactly three
    /// levels; this layout is a stable external contract.
    pub relative_dir: PathBuf,
    /// Real path of the destination directory, with every symlink and
    /// relative component in the parent chain resolved.
    pub real_parent: PathBuf,
}

/// Pure date split: `2024-03-05` -> `2024/202403/20240305`.
pub fn relative_date_dir(mtime: SystemTime) -> PathBuf {
    let dt: DateTime<Local> = mtime.into();
    let (y, m, d) = (dt.year(), dt.month(), dt.day());
    PathBuf::from(format!("{y:04}"))
        .join(format!("{y:04}{m:02}"))
        .join(format!("{y:04}{m:02}{d:02}"))
}

/// Classify a modification time against a destination root.
pub fn classify(mtime: SystemTime, dest_root: &Path) -> Result<DatePath, OrganizeError> {
    let relative_dir = relative_date_dir(mtime);
    let real_parent = real_parent(&dest_root.join(&relative_dir))?;
    Ok(DatePath {
        relative_dir,
        real_parent,
    })
}

/// Resolve the real location of a directory that may not exist yet:
/// canonicalize the deepest existing ancestor, then re-append the missing
/// tail. Directory creation through a symlink indirection would otherwise
/// silently diverge from where files are actually written.
pub fn real_parent(dir: &Path) -> Result<PathBuf, OrganizeError> {
    let mut base = dir.to_path_buf();
    let mut tail: Vec<OsString> = Vec::new();

    while !base.as_os_str().is_empty() {
        match base.symlink_metadata() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (base.parent(), base.file_name()) {
                    (Some(parent), Some(name)) => {
                        tail.push(name.to_os_string());
                        base = parent.to_path_buf();
                    }
                    _ => break,
                }
            }
            // ELOOP (symlink cycle) and ENAMETOOLONG land here.
            Err(e) => {
                return Err(OrganizeError::PathResolution {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        }
    }

    if base.as_os_str().is_empty() {
        base = PathBuf::from(".");
    }

    // dunce avoids verbatim `\\?\` prefixes on Windows.
    let mut real = dunce::canonicalize(&base).map_err(|e| OrganizeError::PathResolution {
        path: base.clone(),
        source: e,
    })?;
    for seg in tail.into_iter().rev() {
        real.push(seg);
    }
    Ok(real)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mtime(y: i32, m: u32, d: u32) -> SystemTime {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().into()
    }

    #[test]
    fn date_dir_is_three_levels() {
        let rel = relative_date_dir(mtime(2024, 3, 5));
        assert_eq!(rel, PathBuf::from("2024/202403/20240305"));
        assert_eq!(rel.components().count(), 3);
    }

    #[test]
    fn single_digit_fields_are_zero_padded() {
        let rel = relative_date_dir(mtime(999, 1, 2));
        assert_eq!(rel, PathBuf::from("0999/099901/09990102"));
    }

    #[test]
    fn real_parent_appends_missing_tail() {
        let td = tempfile::tempdir().unwrap();
        let dir = td.path().join("2024").join("202403");
        let real = real_parent(&dir).unwrap();
        assert!(real.ends_with("2024/202403"));
        // The existing prefix is canonical.
        assert_eq!(
            real.parent().unwrap().parent().unwrap(),
            dunce::canonicalize(td.path()).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn real_parent_resolves_symlinked_ancestor() {
        let td = tempfile::tempdir().unwrap();
        let target = td.path().join("real_dest");
        std::fs::create_dir(&target).unwrap();
        let link = td.path().join("link_dest");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let real = real_parent(&link.join("2024")).unwrap();
        assert_eq!(real, dunce::canonicalize(&target).unwrap().join("2024"));
    }

    #[test]
    fn classify_combines_bucket_and_parent() {
        let td = tempfile::tempdir().unwrap();
        let dp = classify(mtime(2024, 3, 5), td.path()).unwrap();
        assert_eq!(dp.relative_dir, PathBuf::from("2024/202403/20240305"));
        assert!(dp.real_parent.ends_with("2024/202403/20240305"));
    }
}
