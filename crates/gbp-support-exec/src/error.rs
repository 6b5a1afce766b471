//! Error types for gbp-support-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running a command
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Command line contained no words
    #[error("empty command")]
    EmptyCommand,

    /// Command line could not be split into words (e.g. unbalanced quotes)
    #[error("invalid command line: {0}")]
    InvalidCommandLine(String),

    /// Process spawn error
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error during execution
    #[error("I/O error: {0}")]
    IoError(String),

    /// Command timed out
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },
}

impl ExecError {
    /// Check if the command never started
    #[must_use]
    pub fn is_launch_failure(&self) -> bool {
        matches!(
            self,
            ExecError::EmptyCommand | ExecError::InvalidCommandLine(_) | ExecError::SpawnError(_)
        )
    }
}
