//! Filesystem operations: modularized.

mod atomic;
mod copy;
pub mod disk;
mod io_copy;
mod util;

pub use atomic::try_atomic_move;
pub use copy::{copy_then_delete, safe_copy_and_rename};
pub use util::TEMP_PREFIX;

use anyhow::Result;
use std::fs;
use std::io;
use std::path::Path;

use self::util::is_cross_device;

/// Create a directory chain; a concurrent creator winning the race is
/// success, not error.
pub fn create_dir_idempotent(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(anyhow::anyhow!(
            "create destination directory '{}': {}",
            dir.display(),
            e
        )),
    }
}

/// Move one file. Prefers an atomic rename; a cross-device failure degrades
/// to a durable copy followed by source deletion.
pub fn move_file(src: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    move_file_with(src, dest, overwrite, try_atomic_move)
}

/// The rename step is injected so the cross-device routing can be exercised
/// without an actual second volume.
fn move_file_with<F>(src: &Path, dest: &Path, overwrite: bool, rename: F) -> Result<()>
where
    F: Fn(&Path, &Path, bool) -> Result<()>,
{
    match rename(src, dest, overwrite) {
        Ok(()) => Ok(()),
        Err(e) => {
            let cross = e
                .downcast_ref::<io::Error>()
                .map(is_cross_device)
                .unwrap_or(false);
            if !cross {
                return Err(e);
            }
            tracing::debug!(
                src = %src.display(),
                dest = %dest.display(),
                "Rename crossed a volume boundary; using copy+delete"
            );
            if let Some(dest_dir) = dest.parent() {
                disk::check_disk_space(src, dest_dir)?;
            }
            copy_then_delete(src, dest, overwrite)
        }
    }
}
