//! Atomic rename helper.
//! - Performs a rename with context-rich errors.
//! - On Windows, removes an existing destination first when overwriting
//!   (rename doesn't overwrite there).
//! - On Unix, best-effort fsync of the destination directory after rename.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn try_atomic_move(src: &Path, dst: &Path, overwrite: bool) -> Result<()> {
    #[cfg(windows)]
    {
        if overwrite && dst.exists() {
            if let Err(e) = fs::remove_file(dst) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(e).with_context(|| {
                        format!(
                            "remove existing destination before rename: {}",
                            dst.display()
                        )
                    });
                }
            }
        }
    }
    // Unix rename replaces the destination atomically on its own.
    #[cfg(not(windows))]
    let _ = overwrite;

    fs::rename(src, dst)
        .with_context(|| format!("atomic rename '{}' -> '{}'", src.display(), dst.display()))?;

    // Persist the rename itself (best-effort; a failed fsync must not turn a
    // successful rename into an error).
    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}
