//! Plan data model.
//! One immutable decision record per file, produced during scanning and
//! consumed exactly once during execution. A changed filesystem state at
//! execution time yields a new decision, never a mutation of these records.

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// Why an entry was, or will be, skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Destination already exists and the policy is Skip.
    AlreadyExists,
    /// Conflict appeared after scanning; ask-mode never prompts post-scan.
    RuntimeConflict,
    /// The user declined the overwrite when prompted during scanning.
    Declined,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::AlreadyExists => "exists",
            SkipReason::RuntimeConflict => "runtime conflict",
            SkipReason::Declined => "declined",
        }
    }
}

/// Conflict decision attached to a plan entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction {
    /// No conflict at scan time; plain move.
    Move,
    Skip(SkipReason),
    Overwrite,
    /// Move under `<stem>_<n>.<ext>`. The suffix is re-derived against
    /// current filesystem state at execution time; this value records what
    /// the scan saw.
    RenameWithSuffix(u32),
    /// Ask policy hit a conflict but no interactive capability was supplied
    /// to the scanner.
    PromptRequired,
}

impl fmt::Display for ResolvedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedAction::Move => f.write_str("move"),
            ResolvedAction::Skip(r) => write!(f, "skip ({})", r.as_str()),
            ResolvedAction::Overwrite => f.write_str("overwrite"),
            ResolvedAction::RenameWithSuffix(n) => write!(f, "rename (_{n})"),
            ResolvedAction::PromptRequired => f.write_str("prompt required"),
        }
    }
}

/// One planned move. Immutable once created.
#[derive(Debug, Clone)]
pub struct PlannedOperation {
    /// Absolute path of the input file at scan time.
    pub source_path: PathBuf,
    /// Computed destination before conflict resolution.
    pub raw_destination: PathBuf,
    pub resolved_action: ResolvedAction,
    /// When this entry was computed; useful for staleness diagnostics.
    pub scan_timestamp: SystemTime,
}
