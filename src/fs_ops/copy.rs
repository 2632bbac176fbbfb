//! Safe copy-and-rename helpers:
//! - Copy to a temp file in the destination directory
//! - Ensure durability (io_copy fsyncs and closes the temp file)
//! - Atomically rename temp -> dest
//! - On any failure, remove the temp file; the source is never touched until
//!   a complete copy sits at the final name (copy-then-delete, never
//!   delete-then-copy).

use anyhow::{Context, Result, anyhow};
use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;

use super::atomic::try_atomic_move;
use super::{io_copy, util};

/// Core: copy src -> temp in dest dir, then atomic rename temp -> dest.
/// `create_new` semantics on the temp file mean an existing destination is
/// only ever replaced by the final rename, never partially written.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<()> {
    copy_via_temp(src, dest, false)
}

/// Cross-device move fallback: durable copy into place, then delete the
/// source. The original modification time is carried over so the copy
/// classifies into the same date bucket as the original.
pub fn copy_then_delete(src: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    let meta = fs::metadata(src).with_context(|| format!("stat '{}'", src.display()))?;

    copy_via_temp(src, dest, overwrite)?;

    let mtime = FileTime::from_last_modification_time(&meta);
    let atime = FileTime::from_last_access_time(&meta);
    let _ = set_file_times(dest, atime, mtime);

    fs::remove_file(src)
        .with_context(|| format!("remove original file '{}' after copy", src.display()))?;
    Ok(())
}

fn copy_via_temp(src: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;

    fs::create_dir_all(dest_dir)
        .with_context(|| format!("create destination directory '{}'", dest_dir.display()))?;

    let tmp_path = util::unique_temp_path(dest_dir);

    if let Err(e) = io_copy::copy_streaming(src, &tmp_path) {
        // A partial temp file must not linger.
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| {
            format!(
                "copy '{}' to temporary file '{}'",
                src.display(),
                tmp_path.display()
            )
        });
    }

    if let Err(e) = try_atomic_move(&tmp_path, dest, overwrite) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| {
            format!(
                "rename temporary file '{}' -> '{}'",
                tmp_path.display(),
                dest.display()
            )
        });
    }

    Ok(())
}
