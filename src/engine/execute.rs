//! Plan replay with per-entry revalidation.
//!
//! Each entry runs the state machine
//! `Pending -> RevalidateConflict -> {Moved, Skipped, Failed}`. The re-check
//! immediately before acting closes the window between scan-time decisions
//! and execution-time filesystem state (external writers, earlier entries of
//! this same run claiming rename suffixes). One failing entry never aborts
//! the batch.

use anyhow::{Result, anyhow};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::backup;
use crate::classify;
use crate::config::{Config, LogLevel};
use crate::conflict::{self, ConflictPolicy, path_occupied};
use crate::errors::OrganizeError;
use crate::fs_ops;
use crate::plan::{PlannedOperation, ResolvedAction, SkipReason};
use crate::shutdown;
use crate::summary::RunSummary;

/// Terminal states of one entry.
enum Outcome {
    Moved(PathBuf),
    Skipped(SkipReason),
}

/// Post-revalidation decision; prompting is structurally impossible here.
#[derive(Debug)]
enum ExecAction {
    Skip(SkipReason),
    Move(PathBuf),
    Overwrite(PathBuf),
}

/// Replay `plan` in order. The summary is exclusively owned here and records
/// every outcome and warning regardless of the configured verbosity; the
/// verbosity threshold only gates what is emitted to the log, and Quiet
/// still lets error lines through.
pub fn execute(plan: &[PlannedOperation], cfg: &Config) -> RunSummary {
    let mut summary = RunSummary::new();
    let chatty = cfg.log_level != LogLevel::Quiet;

    if chatty {
        info!(entries = plan.len(), policy = %cfg.policy, "Processing started");
    }

    for entry in plan {
        if shutdown::is_requested() {
            if chatty {
                warn!("Shutdown requested; stopping after completed entries");
            }
            summary.record_warning("interrupted: remaining entries were not processed");
            break;
        }

        match run_entry(entry, cfg, &mut summary, chatty) {
            Ok(Outcome::Moved(dest)) => {
                if chatty {
                    info!(src = %entry.source_path.display(), dest = %dest.display(), "Moved");
                }
                summary.record_moved();
            }
            Ok(Outcome::Skipped(reason)) => {
                debug!(src = %entry.source_path.display(), reason = reason.as_str(), "Skipped");
                summary.record_skipped(reason);
            }
            Err(e) => {
                // Always surfaced, even in quiet mode.
                error!(src = %entry.source_path.display(), error = %e, "Entry failed");
                summary.record_failure(&entry.source_path, format!("{e:#}"));
            }
        }
    }

    summary
}

fn run_entry(
    entry: &PlannedOperation,
    cfg: &Config,
    summary: &mut RunSummary,
    chatty: bool,
) -> Result<Outcome> {
    let exists_now = path_occupied(&entry.raw_destination);
    let action = match revalidate(entry, cfg.policy, exists_now) {
        Ok(a) => a,
        Err(OrganizeError::InteractiveUnavailable) => {
            let msg = format!(
                "runtime conflict, ask-mode does not prompt post-scan: '{}'",
                entry.raw_destination.display()
            );
            if chatty {
                warn!(dest = %entry.raw_destination.display(), "{msg}");
            }
            summary.record_warning(msg);
            return Ok(Outcome::Skipped(SkipReason::RuntimeConflict));
        }
        Err(e) => return Err(e.into()),
    };

    let (dest, overwrite) = match action {
        ExecAction::Skip(reason) => return Ok(Outcome::Skipped(reason)),
        ExecAction::Move(d) => (d, false),
        ExecAction::Overwrite(d) => (d, true),
    };

    // Create the date directory lazily, at its real (symlink-resolved)
    // location. Idempotent across entries and tolerant of concurrent
    // creators.
    let parent = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    let real_parent = classify::real_parent(parent)?;
    fs_ops::create_dir_idempotent(&real_parent)?;

    let file_name = dest
        .file_name()
        .ok_or_else(|| anyhow!("destination has no file name: {}", dest.display()))?;
    let dest = real_parent.join(file_name);

    if overwrite && cfg.backup {
        backup::create_safety_copy(&dest).map_err(|e| OrganizeError::BackupFailed {
            path: dest.clone(),
            reason: format!("{e:#}"),
        })?;
        if cfg.backup_keep > 0 {
            // Retention failures are not worth failing the move over.
            if let Err(e) = backup::prune_backups(&dest, cfg.backup_keep) {
                if chatty {
                    warn!(dest = %dest.display(), error = %e, "Could not prune old safety copies");
                }
                summary.record_warning(format!("prune of old safety copies failed: {e:#}"));
            }
        }
    }

    fs_ops::move_file(&entry.source_path, &dest, overwrite)?;
    Ok(Outcome::Moved(dest))
}

/// Map the scan-time decision onto current filesystem state.
///
/// The plan entry itself is never mutated; changed state produces a fresh
/// decision here. The match over `ConflictPolicy` is exhaustive, so an
/// unresolvable conflict cannot be represented.
fn revalidate(
    entry: &PlannedOperation,
    policy: ConflictPolicy,
    exists_now: bool,
) -> Result<ExecAction, OrganizeError> {
    if !exists_now {
        // Any scan-time conflict is gone; a plain move is correct under
        // every policy.
        return Ok(ExecAction::Move(entry.raw_destination.clone()));
    }

    match policy {
        ConflictPolicy::Skip => Ok(ExecAction::Skip(SkipReason::AlreadyExists)),
        ConflictPolicy::Overwrite => Ok(ExecAction::Overwrite(entry.raw_destination.clone())),
        ConflictPolicy::Rename => {
            // Always re-run the suffix search: earlier entries of this run
            // may have claimed suffixes since scan time.
            let n = conflict::lowest_free_suffix(&entry.raw_destination, path_occupied);
            Ok(ExecAction::Move(conflict::suffixed_destination(
                &entry.raw_destination,
                n,
            )))
        }
        ConflictPolicy::Ask => match &entry.resolved_action {
            // The user answered during the scan and the conflict is still
            // the one they answered about.
            ResolvedAction::Overwrite => Ok(ExecAction::Overwrite(entry.raw_destination.clone())),
            ResolvedAction::Skip(r) => Ok(ExecAction::Skip(*r)),
            // Conflict appeared after scanning, or was never answered: no
            // interactive capability exists at execution time. Deliberate
            // rule; prompting here would block an unattended run.
            _ => Err(OrganizeError::InteractiveUnavailable),
        },
    }
}
