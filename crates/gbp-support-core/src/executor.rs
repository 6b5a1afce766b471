//! Action execution against the output archive

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gbp_support_exec::{CommandRunner, ExecError, split_command};
use glob::glob_with;
use tempfile::NamedTempFile;
use tokio::task::yield_now;
use tracing::{debug, info, instrument, warn};

use crate::action::{Action, Operation};
use crate::archive::BundleArchive;
use crate::config::GLOB_OPTIONS;
use crate::error::CoreError;
use crate::host::HostFacts;
use crate::options::OPT_RECURSIVE;

/// Archive directory holding captured command output
pub const COMMANDS_DIR: &str = "commands";

/// What happened when an action was executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The host did not match the action's `have_systemd` condition
    Skipped,
    /// Copy finished; `entries` matched paths were added
    Copied { entries: usize },
    /// Command output was archived; `status` is `None` if the command timed out
    Captured { status: Option<i32> },
    /// The action could not be carried out
    Failed,
    /// Unknown operation or nothing to do
    Ignored,
}

/// Archive name for the output of `command`
#[must_use]
pub fn command_entry_name(command: &str) -> PathBuf {
    Path::new(COMMANDS_DIR).join(command.replace([' ', '/'], "_"))
}

/// Runs actions, one at a time, into a [`BundleArchive`]
pub struct ActionExecutor {
    runner: Arc<dyn CommandRunner>,
    host: HostFacts,
    scratch_dir: Option<PathBuf>,
}

impl ActionExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, host: HostFacts) -> Self {
        Self {
            runner,
            host,
            scratch_dir: None,
        }
    }

    /// Create command capture files in `dir` instead of the system temp dir
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Whether the action's condition (if any) matches this host
    #[must_use]
    pub fn should_execute(&self, action: &Action) -> bool {
        match action.options.systemd_expectation() {
            Some(expected) => expected == self.host.have_systemd,
            None => true,
        }
    }

    /// Execute one action. Failures are logged and reported in the outcome,
    /// never returned, so the caller can carry on with the next action.
    #[instrument(skip(self, action, archive), fields(action = %action))]
    pub async fn execute(&self, action: &Action, archive: &mut BundleArchive) -> ActionOutcome {
        if !self.should_execute(action) {
            debug!(have_systemd = self.host.have_systemd, "skipping action for this host");
            return ActionOutcome::Skipped;
        }

        match &action.operation {
            Operation::Copy => match self.copy(action, archive).await {
                Ok(entries) => ActionOutcome::Copied { entries },
                Err(e) => {
                    warn!(pattern = %action.arguments, error = %e, "could not copy files");
                    ActionOutcome::Failed
                }
            },
            Operation::Exec => match self.exec(action, archive).await {
                Ok(outcome) => outcome,
                Err(CoreError::Exec(e)) if e.is_launch_failure() => {
                    warn!(command = %action.arguments, error = %e, "could not run command");
                    ActionOutcome::Failed
                }
                Err(e) => {
                    warn!(command = %action.arguments, error = %e, "could not capture command output");
                    ActionOutcome::Failed
                }
            },
            Operation::Unknown(token) => {
                info!(operation = %token, "ignoring unknown operation");
                ActionOutcome::Ignored
            }
        }
    }

    /// Archive writes block; the task yields to the runtime before each match.
    async fn copy(&self, action: &Action, archive: &mut BundleArchive) -> Result<usize, CoreError> {
        let recursive = action.options.has(OPT_RECURSIVE);
        debug!(pattern = %action.arguments, recursive, "copying files");

        let matches = glob_with(&action.arguments, GLOB_OPTIONS)
            .map_err(|e| CoreError::InvalidPattern(e.to_string()))?;

        let mut entries = 0;
        for entry in matches {
            yield_now().await;

            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "error accessing path");
                    continue;
                }
            };

            if !recursive && path.is_dir() {
                continue;
            }

            let real = match fs::canonicalize(&path) {
                Ok(real) => real,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unable to resolve path");
                    continue;
                }
            };

            let added = if recursive && real.is_dir() {
                archive.append_dir_all(&real, &path)
            } else {
                archive.append_file(&real, &path)
            };

            match added {
                Ok(()) => entries += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "unable to add file"),
            }
        }

        Ok(entries)
    }

    async fn exec(
        &self,
        action: &Action,
        archive: &mut BundleArchive,
    ) -> Result<ActionOutcome, CoreError> {
        let command = action.arguments.as_str();
        if command.trim().is_empty() {
            return Ok(ActionOutcome::Ignored);
        }

        let argv = split_command(command)?;

        // Removed from disk when dropped, on every path out of this function
        let capture = match &self.scratch_dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(|e| CoreError::CaptureFile(e.to_string()))?;
        let sink = capture
            .as_file()
            .try_clone()
            .map_err(|e| CoreError::CaptureFile(e.to_string()))?;

        debug!(command, tempfile = %capture.path().display(), "executing command");

        let status = match self.runner.run_captured(&argv, sink).await {
            Ok(result) => {
                if !result.success() {
                    warn!(
                        command,
                        status = result.status,
                        "command exited with non-zero return code"
                    );
                }
                Some(result.status)
            }
            Err(ExecError::Timeout { timeout }) => {
                warn!(command, timeout = ?timeout, "command timed out, keeping partial output");
                None
            }
            Err(e) => return Err(e.into()),
        };

        archive.append_file(capture.path(), &command_entry_name(command))?;
        Ok(ActionOutcome::Captured { status })
    }
}
