//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a conservative-permission template if missing (unless
//!   DATESORT_CONFIG points somewhere explicit).
//!
//! This module only reads/writes the config file; directory validation
//! happens elsewhere. CLI flags override anything loaded here.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{BACKUP_KEEP_DEFAULT, DEST_BASE_DEFAULT, SOURCE_BASE_DEFAULT};
use crate::conflict::ConflictPolicy;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_base: Option<String>,
    dest_base: Option<String>,
    recursive: Option<bool>,
    on_conflict: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    backup: Option<bool>,
    backup_keep: Option<usize>,
}

fn trimmed_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

// Map XmlConfig onto a default Config.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();

    if let Some(p) = trimmed_path(parsed.source_base.as_deref()) {
        cfg.source_base = p;
    }
    if let Some(p) = trimmed_path(parsed.dest_base.as_deref()) {
        cfg.dest_base = p;
    }
    cfg.log_file = trimmed_path(parsed.log_file.as_deref());

    if let Some(s) = parsed.on_conflict.as_deref() {
        if let Some(policy) = ConflictPolicy::parse(s.trim()) {
            cfg.policy = policy;
        }
    }
    if let Some(s) = parsed.log_level.as_deref() {
        if let Some(level) = LogLevel::parse(s.trim()) {
            cfg.log_level = level;
        }
    }
    cfg.recursive = parsed.recursive.unwrap_or(false);
    cfg.backup = parsed.backup.unwrap_or(false);
    cfg.backup_keep = parsed.backup_keep.unwrap_or(BACKUP_KEEP_DEFAULT);

    cfg
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed))
}

/// Read config from the effective path ($DATESORT_CONFIG or the platform
/// default). Returns None when no config file exists or it fails to parse;
/// callers then run on defaults plus CLI flags.
pub fn load_config_from_xml() -> Option<Config> {
    let cfg_path = default_config_path().ok()?;
    if !cfg_path.exists() {
        return None;
    }
    match load_config_from_xml_path(&cfg_path) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            debug!(path = %cfg_path.display(), error = %e, "Ignoring unusable config file");
            None
        }
    }
}

/// Create the template config file and its parent directory.
/// Refuses to write through a symlinked ancestor; best-effort 0700/0600
/// permissions on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        anyhow::bail!(
            "refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(parent, fs::Permissions::from_mode(0o700));
        }
    }

    let content = format!(
        "<!--\n  datesort configuration (XML)\n\n  Fields:\n    source_base  -> directory scanned for files to sort\n    dest_base    -> root of the YYYY/YYYYMM/YYYYMMDD tree\n    recursive    -> true/false: descend into subdirectories\n    on_conflict  -> skip | overwrite | rename | ask\n    log_level    -> quiet | normal | verbose | debug\n    log_file     -> path to log file (optional; stdout still used)\n    backup       -> true/false: safety copy before any overwrite\n    backup_keep  -> safety copies kept per file (0 = unlimited)\n\n  CLI flags override XML values.\n-->\n<config>\n  <source_base>{SOURCE_BASE_DEFAULT}</source_base>\n  <dest_base>{DEST_BASE_DEFAULT}</dest_base>\n  <recursive>false</recursive>\n  <on_conflict>skip</on_conflict>\n  <log_level>normal</log_level>\n  <backup>false</backup>\n  <backup_keep>{BACKUP_KEEP_DEFAULT}</backup_keep>\n</config>\n"
    );

    fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }

    info!("Created template config at {}", path.display());
    Ok(())
}

/// Create the default config if DATESORT_CONFIG is not set and none exists;
/// returns the created path so the CLI can inform the user.
pub fn ensure_default_config_exists() -> Option<PathBuf> {
    if env::var_os("DATESORT_CONFIG").is_some() {
        return None;
    }
    let cfg_path = default_config_path().ok()?;
    if cfg_path.exists() {
        return None;
    }
    match create_template_config(&cfg_path) {
        Ok(()) => Some(cfg_path),
        Err(e) => {
            debug!(path = %cfg_path.display(), error = %e, "Could not create template config");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let xml = "<config>\n  <source_base>/in</source_base>\n  <dest_base>/out</dest_base>\n  <recursive>true</recursive>\n  <on_conflict>rename</on_conflict>\n  <log_level>verbose</log_level>\n  <backup>true</backup>\n  <backup_keep>5</backup_keep>\n</config>";
        let parsed: XmlConfig = from_xml_str(xml).unwrap();
        let cfg = xml_to_config(parsed);
        assert_eq!(cfg.source_base, PathBuf::from("/in"));
        assert_eq!(cfg.dest_base, PathBuf::from("/out"));
        assert!(cfg.recursive);
        assert_eq!(cfg.policy, ConflictPolicy::Rename);
        assert_eq!(cfg.log_level, LogLevel::Verbose);
        assert!(cfg.backup);
        assert_eq!(cfg.backup_keep, 5);
    }

    #[test]
    fn whitespace_and_missing_fields_use_defaults() {
        let xml = "<config>\n  <source_base>  /in  </source_base>\n  <log_file>   </log_file>\n</config>";
        let parsed: XmlConfig = from_xml_str(xml).unwrap();
        let cfg = xml_to_config(parsed);
        assert_eq!(cfg.source_base, PathBuf::from("/in"));
        assert_eq!(cfg.dest_base, PathBuf::from(DEST_BASE_DEFAULT));
        assert!(cfg.log_file.is_none());
        assert_eq!(cfg.policy, ConflictPolicy::Skip);
        assert_eq!(cfg.backup_keep, BACKUP_KEEP_DEFAULT);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let xml = "<config><bogus>1</bogus></config>";
        assert!(from_xml_str::<XmlConfig>(xml).is_err());
    }
}
