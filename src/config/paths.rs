//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked
//! ancestors for safety.

use anyhow::{Result, anyhow};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file path: $DATESORT_CONFIG if set, else the OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os("DATESORT_CONFIG") {
        return Ok(PathBuf::from(p));
    }
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow!("no configuration directory known for this platform"))?;
    Ok(base.join("datesort").join("config.xml"))
}

/// OS-appropriate default log file path (data dir).
pub fn default_log_path() -> Result<PathBuf> {
    let base =
        dirs::data_dir().ok_or_else(|| anyhow!("no data directory known for this platform"))?;
    Ok(base.join("datesort").join("datesort.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
