//! Local command execution using `tokio::process`

use std::fs::File;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

use crate::error::ExecError;
use crate::result::CommandResult;
use crate::traits::CommandRunner;

/// Local command runner
///
/// Executes commands on the local machine using `tokio::process::Command`.
/// Commands are run directly from their argument vector, never through a shell.
#[derive(Debug, Clone, Default)]
pub struct LocalRunner {
    timeout: Option<Duration>,
}

impl LocalRunner {
    /// Create a new local runner without a timeout
    #[must_use]
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill commands that run longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn spawn(argv: &[String], stdout: Stdio, stderr: Stdio) -> Result<Child, ExecError> {
        let (program, args) = argv.split_first().ok_or(ExecError::EmptyCommand)?;

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError(format!("{program}: {e}")))
    }

    /// Wait for the child, enforcing the timeout if one is set
    async fn wait(&self, mut child: Child, start: Instant) -> Result<CommandResult, ExecError> {
        let waited = match self.timeout {
            Some(limit) => match timeout(limit, child.wait()).await.ok() {
                Some(waited) => waited,
                None => {
                    error!(timeout = ?limit, elapsed = ?start.elapsed(), "command timed out");
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "failed to kill timed out command");
                    }
                    return Err(ExecError::Timeout { timeout: limit });
                }
            },
            None => child.wait().await,
        };

        let status = waited.map_err(|e| ExecError::IoError(e.to_string()))?;
        let duration = start.elapsed();
        let status = status.code().unwrap_or(-1);

        debug!(status = status, duration = ?duration, "command completed");

        Ok(CommandResult { status, duration })
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    #[instrument(skip(self, sink), level = "debug")]
    async fn run_captured(&self, argv: &[String], sink: File) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        let stderr = sink
            .try_clone()
            .map_err(|e| ExecError::IoError(e.to_string()))?;
        let child = Self::spawn(argv, Stdio::from(sink), Stdio::from(stderr))?;

        self.wait(child, start).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_status(&self, argv: &[String]) -> Result<CommandResult, ExecError> {
        let start = Instant::now();
        let child = Self::spawn(argv, Stdio::null(), Stdio::null())?;
        self.wait(child, start).await
    }

    fn runner_type(&self) -> &'static str {
        "local"
    }
}
