//! Typed error definitions for datesort.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("failed to resolve real path for '{path}': {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{op} '{path}': {source}")]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Ask-mode conflict detected outside the scan phase. Internal signal;
    /// the engine maps it to an automatic skip before it reaches a user.
    #[error("interactive prompt is only available during the scan phase")]
    InteractiveUnavailable,

    #[error("safety copy of '{path}' failed: {reason}")]
    BackupFailed { path: PathBuf, reason: String },
}
