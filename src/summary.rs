//! Per-run outcome accumulator.
//! Owned and mutated exclusively by the execution engine during a run, then
//! handed to the caller. Warnings are recorded here regardless of verbosity;
//! verbosity only controls what is surfaced on the console.

use std::fmt;
use std::path::PathBuf;

use crate::plan::SkipReason;

/// A single failed entry with its cause. Never silently dropped.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub source: PathBuf,
    pub cause: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    moved: u64,
    skipped: u64,
    failures: Vec<FailureRecord>,
    warnings: Vec<String>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_moved(&mut self) {
        self.moved += 1;
    }

    pub fn record_skipped(&mut self, _reason: SkipReason) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, source: impl Into<PathBuf>, cause: impl fmt::Display) {
        self.failures.push(FailureRecord {
            source: source.into(),
            cause: cause.to_string(),
        });
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn moved(&self) -> u64 {
        self.moved
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn failed(&self) -> u64 {
        self.failures.len() as u64
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True when no entry failed; maps to process exit code 0.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} moved, {} skipped, {} failed",
            self.moved,
            self.skipped,
            self.failed()
        )
    }
}
