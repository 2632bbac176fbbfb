//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler,
//! validates paths, then drives the two phases: scan (builds the plan,
//! prompting happens here under the Ask policy) and execute (replays it).
//! Exit code 0 iff no entry failed.

use anyhow::Result;
use std::process::ExitCode;
use tracing::debug;

use crate::cli::Args;
use crate::config;
use crate::conflict::{ConflictPolicy, Prompt, StdinPrompt};
use crate::logging::init_tracing;
use crate::output as out;
use crate::{engine, scan, shutdown};

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }

    // First run without explicit roots: write a template and let the user
    // fill it in before anything touches the filesystem.
    if args.source.is_none() && args.dest.is_none() {
        if let Some(path) = config::ensure_default_config_exists() {
            out::print_info(&format!(
                "A template datesort config was written to: {}",
                path.display()
            ));
            out::print_info(
                "Edit it to set `source_base` and `dest_base`, then re-run. \
                 To use a different location set DATESORT_CONFIG.",
            );
            return Ok(ExitCode::SUCCESS);
        }
    }

    let mut cfg = config::load_config_from_xml().unwrap_or_default();
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)?;

    ctrlc::set_handler(|| {
        shutdown::request();
        out::print_warn("received interrupt; finishing the current entry then stopping");
    })?;

    debug!("Starting datesort: {:?}", cfg);
    cfg.validate()?;

    // The interactive capability is an explicit input to the scan; execution
    // never prompts.
    let mut stdin_prompt;
    let prompt: Option<&mut dyn Prompt> =
        if cfg.policy == ConflictPolicy::Ask && atty::is(atty::Stream::Stdin) {
            stdin_prompt = StdinPrompt;
            Some(&mut stdin_prompt)
        } else {
            None
        };

    let plan = scan::plan(&cfg, prompt)?;

    if cfg.dry_run {
        for op in &plan {
            out::print_user(&format!(
                "{} -> {}  [{}]",
                op.source_path.display(),
                op.raw_destination.display(),
                op.resolved_action
            ));
        }
        out::print_info(&format!(
            "dry-run: {} entries planned; nothing was moved",
            plan.len()
        ));
        return Ok(ExitCode::SUCCESS);
    }

    let summary = engine::execute(&plan, &cfg);

    for failure in summary.failures() {
        out::print_error(&format!("{}: {}", failure.source.display(), failure.cause));
    }
    out::print_user(&summary.to_string());

    Ok(if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_config_location() {
    if let Some(explicit) = std::env::var_os("DATESORT_CONFIG") {
        out::print_info(&format!(
            "Using DATESORT_CONFIG (explicit): {}",
            std::path::PathBuf::from(explicit).display()
        ));
        return;
    }
    match config::default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default datesort config path: {}", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there yet; one is created on a bare first run.",
                );
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}
