//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//! CLI flags override config values (which are loaded from XML if present).

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::conflict::ConflictPolicy;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Sort files into a YYYY/YYYYMM/YYYYMMDD tree by modification date"
)]
pub struct Args {
    /// Source directory to scan.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Destination root for the date tree.
    #[arg(value_name = "DEST", value_hint = ValueHint::DirPath)]
    pub dest: Option<PathBuf>,

    /// Recurse into subdirectories of SOURCE.
    #[arg(short, long)]
    pub recursive: bool,

    /// Conflict policy: skip, overwrite, rename, ask.
    #[arg(long, value_name = "POLICY")]
    pub on_conflict: Option<String>,

    /// Show what would be done, but do not modify files/directories.
    #[arg(long)]
    pub dry_run: bool,

    /// Create a timestamped safety copy before any overwrite.
    #[arg(long)]
    pub backup: bool,

    /// Keep at most N safety copies per file (0 = unlimited).
    #[arg(long, value_name = "N")]
    pub backup_keep: Option<usize>,

    /// Only errors and the final summary (shorthand for --log-level quiet).
    #[arg(short, long)]
    pub quiet: bool,

    /// Per-file detail (shorthand for --log-level verbose).
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level: quiet, normal, verbose, debug.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to PATH.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by datesort and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --quiet > --verbose > --log-level value > None.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            return Some(LogLevel::Quiet);
        }
        if self.verbose {
            return Some(LogLevel::Verbose);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset
    /// flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(src) = &self.source {
            cfg.source_base = src.clone();
        }
        if let Some(dest) = &self.dest {
            cfg.dest_base = dest.clone();
        }
        if self.recursive {
            cfg.recursive = true;
        }
        if let Some(policy) = self.on_conflict.as_deref().and_then(ConflictPolicy::parse) {
            cfg.policy = policy;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.backup {
            cfg.backup = true;
        }
        if let Some(keep) = self.backup_keep {
            cfg.backup_keep = keep;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
