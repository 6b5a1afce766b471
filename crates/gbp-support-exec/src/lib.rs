//! gbp-support-exec: Local command execution
//!
//! Provides the runner trait and a local implementation for running diagnostic
//! commands with their combined output captured into a file.

pub mod error;
pub mod local;
pub mod result;
pub mod split;
pub mod traits;

pub use error::ExecError;
pub use local::LocalRunner;
pub use result::CommandResult;
pub use split::split_command;
pub use traits::CommandRunner;
