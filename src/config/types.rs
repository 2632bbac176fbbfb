//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers. The level is
//!   carried inside Config and handed to the engine explicitly, so repeated
//!   in-process runs (tests, library callers) never leak verbosity state
//!   through a process-wide singleton.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{BACKUP_KEEP_DEFAULT, DEST_BASE_DEFAULT, SOURCE_BASE_DEFAULT};
use crate::conflict::ConflictPolicy;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors and the final summary
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-file detail
    Verbose,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "info" => Some(LogLevel::Normal),
            "verbose" | "detailed" => Some(LogLevel::Verbose),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one organize run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree scanned for files to sort
    pub source_base: PathBuf,
    /// Root of the YYYY/YYYYMM/YYYYMMDD destination tree
    pub dest_base: PathBuf,
    /// Recurse into subdirectories of the source
    pub recursive: bool,
    /// Run-wide naming-collision rule; immutable for the run
    pub policy: ConflictPolicy,
    /// Console verbosity, also consulted by the engine
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, plan and report but do not modify the filesystem
    pub dry_run: bool,
    /// Take a timestamped safety copy before any overwrite
    pub backup: bool,
    /// Safety copies kept per file (0 = unlimited)
    pub backup_keep: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_base: PathBuf::from(SOURCE_BASE_DEFAULT),
            dest_base: PathBuf::from(DEST_BASE_DEFAULT),
            recursive: false,
            policy: ConflictPolicy::default(),
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
            backup: false,
            backup_keep: BACKUP_KEEP_DEFAULT,
        }
    }
}

impl Config {
    /// Construct a Config with explicit bases; other fields use defaults.
    pub fn new(source_base: impl Into<PathBuf>, dest_base: impl Into<PathBuf>) -> Self {
        Self {
            source_base: source_base.into(),
            dest_base: dest_base.into(),
            ..Default::default()
        }
    }

    /// Same, with a policy. Convenient for tests and library callers.
    pub fn with_policy(
        source_base: impl Into<PathBuf>,
        dest_base: impl Into<PathBuf>,
        policy: ConflictPolicy,
    ) -> Self {
        Self {
            policy,
            ..Self::new(source_base, dest_base)
        }
    }
}
