//! Disk space preflight (Unix).
//! Before a cross-device copy, compares the source size to available space
//! on the destination filesystem using statvfs; no-op on non-Unix.

use anyhow::Result;
use std::path::Path;

#[cfg(unix)]
pub fn check_disk_space(src: &Path, dest_dir: &Path) -> Result<()> {
    use anyhow::bail;
    use std::ffi::CString;
    use std::fs;
    use std::os::unix::fs::MetadataExt;

    let src_size: u128 = fs::metadata(src)?.size() as u128;

    let dest_c = CString::new(dest_dir.to_string_lossy().into_owned())
        .map_err(|e| anyhow::anyhow!("invalid destination path '{}': {}", dest_dir.display(), e))?;
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(dest_c.as_ptr(), &mut stat) };
    if rc != 0 {
        bail!("failed to stat filesystem for {}", dest_dir.display());
    }
    let available: u128 = (stat.f_bavail as u128).saturating_mul(stat.f_frsize as u128);
    if src_size > available {
        bail!(
            "insufficient space on destination: need {} bytes, have {} bytes",
            src_size,
            available
        );
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn check_disk_space(_src: &Path, _dest_dir: &Path) -> Result<()> {
    Ok(())
}
