//! Core library for `datesort`.
//!
//! Sorts files into a date-derived directory tree
//! (`YYYY/YYYYMM/YYYYMMDD/`) in two strictly separated phases: a scan that
//! produces an immutable plan, and an execution pass that replays the plan
//! with a conflict re-check per entry. Moves prefer an atomic rename and
//! degrade to a durable copy+delete across volumes.

pub mod app;
pub mod backup;
pub mod classify;
pub mod cli;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod logging;
pub mod output;
pub mod plan;
pub mod scan;
pub mod shutdown;
pub mod summary;

pub use classify::{DatePath, classify};
pub use config::{Config, LogLevel};
pub use conflict::{ConflictPolicy, Prompt, StdinPrompt};
pub use errors::OrganizeError;
pub use plan::{PlannedOperation, ResolvedAction, SkipReason};
pub use summary::{FailureRecord, RunSummary};
