//! Command runner trait

use std::fs::File;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `argv` with both stdout and stderr written into `sink`.
    ///
    /// A non-zero exit is reported through `CommandResult::status`, not as an error.
    async fn run_captured(&self, argv: &[String], sink: File) -> Result<CommandResult, ExecError>;

    /// Run `argv` with all output discarded, reporting only how it exited.
    async fn run_status(&self, argv: &[String]) -> Result<CommandResult, ExecError>;

    fn runner_type(&self) -> &'static str;
}
