//! Core error types for gbp-support-core

use std::path::PathBuf;

use gbp_support_exec::ExecError;
use thiserror::Error;

/// Errors that can occur while loading actions or building the bundle
#[derive(Error, Debug)]
pub enum CoreError {
    /// Action definition file could not be read
    #[error("unable to read action file {path}: {reason}")]
    ActionFileRead {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        reason: String,
    },

    /// Output archive could not be created
    #[error("unable to open archive {path}: {reason}")]
    ArchiveOpen {
        /// Destination that failed
        path: PathBuf,
        /// Underlying error
        reason: String,
    },

    /// Adding an entry to, or finalizing, the archive failed
    #[error("unable to write archive entry {name}: {reason}")]
    ArchiveWrite {
        /// Archive-internal name of the entry
        name: String,
        /// Underlying error
        reason: String,
    },

    /// Temporary file for command output could not be set up
    #[error("unable to create capture file: {0}")]
    CaptureFile(String),

    /// Glob pattern was malformed
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Command execution failed
    #[error(transparent)]
    Exec(#[from] ExecError),
}
