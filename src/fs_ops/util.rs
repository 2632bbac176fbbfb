use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix used for transient files while copying into a destination
/// directory. Anything matching `.datesort.*.tmp` is ours.
pub const TEMP_PREFIX: &str = ".datesort.";

pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!("{TEMP_PREFIX}{pid}.{nanos}.tmp"))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind has no stable CrossDeviceLink variant, so detect
    // EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            if code == libc::EXDEV {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[cfg(windows)]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn exdev_is_detected() {
        let e = io::Error::from_raw_os_error(libc::EXDEV);
        assert!(is_cross_device(&e));
    }

    #[test]
    fn other_errors_are_not_cross_device() {
        assert!(!is_cross_device(&io::Error::from(io::ErrorKind::NotFound)));
        #[cfg(unix)]
        assert!(!is_cross_device(&io::Error::from_raw_os_error(libc::EACCES)));
    }

    #[test]
    fn temp_paths_are_distinct_and_prefixed() {
        let dir = Path::new("/d");
        let a = unique_temp_path(dir);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = unique_temp_path(dir);
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(TEMP_PREFIX));
        assert!(name.ends_with(".tmp"));
    }
}
