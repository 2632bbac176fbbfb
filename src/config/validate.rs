//! Config validation logic.
//! Verifies directory existence, readability/writability, and disjoint
//! source/destination roots before any plan is built.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::Config;

impl Config {
    /// Validate existence, readability/writability and canonical paths.
    pub fn validate(&self) -> Result<()> {
        let src = &self.source_base;
        let dest = &self.dest_base;

        // 1) Source base: must exist, be a directory, and be readable.
        if !src.exists() {
            bail!("source base does not exist: {}", src.display());
        }
        if !src.is_dir() {
            bail!("source base is not a directory: {}", src.display());
        }
        fs::read_dir(src).with_context(|| {
            format!(
                "cannot read source base '{}'; check permissions",
                src.display()
            )
        })?;
        debug!("source base readable: {}", src.display());

        // 2) Destination base: must be a directory; create if missing;
        //    ensure writable.
        if dest.exists() && !dest.is_dir() {
            bail!(
                "destination base exists but isn't a directory: {}",
                dest.display()
            );
        }
        if !dest.exists() {
            fs::create_dir_all(dest).with_context(|| {
                format!("failed to create destination base '{}'", dest.display())
            })?;
            info!("Created destination base: {}", dest.display());
        }
        writable_probe(dest).with_context(|| {
            format!(
                "cannot write to destination base '{}'; check permissions",
                dest.display()
            )
        })?;
        debug!("destination base writable: {}", dest.display());

        // 3) Resolve symlinks and ensure the bases are disjoint. A nested
        //    destination would make the scanner re-ingest its own output.
        let src_real = fs::canonicalize(src).unwrap_or_else(|_| src.clone());
        let dest_real = fs::canonicalize(dest).unwrap_or_else(|_| dest.clone());

        if src_real == dest_real {
            bail!(
                "source and destination resolve to the same path: '{}'",
                src_real.display()
            );
        }
        if dest_real.starts_with(&src_real) {
            bail!(
                "destination '{}' must not be inside source '{}'",
                dest_real.display(),
                src_real.display()
            );
        }
        if src_real.starts_with(&dest_real) {
            bail!(
                "source '{}' must not be inside destination '{}'",
                src_real.display(),
                dest_real.display()
            );
        }

        info!(
            "Config validated: source='{}' dest='{}' policy={}",
            src.display(),
            dest.display(),
            self.policy
        );
        Ok(())
    }
}

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering anything.
fn writable_probe(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(format!(".datesort_probe_{}.tmp", std::process::id()));
    match fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
    {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
