//! Scan phase.
//! Walks the source tree and builds the immutable plan without mutating the
//! filesystem — metadata reads only, so dry-run reuses the planner
//! unchanged. Walking order is lexicographic per directory level, which
//! makes plans (and therefore rename-suffix assignment) reproducible for
//! the same tree snapshot.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::classify;
use crate::config::Config;
use crate::conflict::{self, ConflictPolicy, Prompt, path_occupied};
use crate::plan::{PlannedOperation, ResolvedAction};

/// Build the plan for one run. One-shot: re-invoking requires a fresh scan,
/// since destinations may differ if files changed in between.
///
/// The interactive capability is an explicit input; all Ask-mode prompting
/// happens here, never during execution.
pub fn plan(cfg: &Config, mut prompt: Option<&mut dyn Prompt>) -> Result<Vec<PlannedOperation>> {
    // An unreadable source root is fatal: no plan, no execution phase.
    std::fs::read_dir(&cfg.source_base)
        .with_context(|| format!("read source root '{}'", cfg.source_base.display()))?;

    let max_depth = if cfg.recursive { usize::MAX } else { 1 };

    // Destinations claimed by earlier entries of this same plan. Files only
    // land on disk during execution, so `exists` alone would let two
    // same-named sources plan the same target.
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut entries = Vec::new();

    let walker = WalkDir::new(&cfg.source_base)
        .min_depth(1)
        .max_depth(max_depth)
        // Symlinks to files are planned by their target content; preserving
        // symlink-ness across the move is an explicit non-goal.
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry during scan");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let source_path = entry.path().to_path_buf();
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %source_path.display(), error = %e, "Cannot stat entry; skipping");
                continue;
            }
        };
        let mtime = match meta.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %source_path.display(), error = %e, "No modification time; skipping");
                continue;
            }
        };

        let relative_dir = classify::relative_date_dir(mtime);
        let raw_destination = cfg
            .dest_base
            .join(&relative_dir)
            .join(entry.file_name());

        let exists = path_occupied(&raw_destination) || claimed.contains(&raw_destination);
        let resolved_action = if exists && cfg.policy == ConflictPolicy::Rename {
            // The suffix search must also treat in-plan claims as occupied.
            let n = conflict::lowest_free_suffix(&raw_destination, |p| {
                path_occupied(p) || claimed.contains(p)
            });
            ResolvedAction::RenameWithSuffix(n)
        } else {
            // Reborrow per iteration; handing the Option itself over would
            // move the capability out of the loop.
            let reborrowed = prompt.as_deref_mut();
            conflict::resolve(cfg.policy, &raw_destination, exists, reborrowed)?
        };

        let target = match resolved_action {
            ResolvedAction::RenameWithSuffix(n) => {
                conflict::suffixed_destination(&raw_destination, n)
            }
            _ => raw_destination.clone(),
        };
        claimed.insert(target);

        debug!(
            src = %source_path.display(),
            dest = %raw_destination.display(),
            action = %resolved_action,
            "Planned"
        );
        entries.push(PlannedOperation {
            source_path,
            raw_destination,
            resolved_action,
            scan_timestamp: SystemTime::now(),
        });
    }

    Ok(entries)
}
