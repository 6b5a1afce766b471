//! Host capability detection
//!
//! Facts are computed once per run, before any action executes, and passed
//! to the executor by value.

use gbp_support_exec::CommandRunner;
use tracing::{debug, warn};

/// Capabilities of the host the bundle is collected on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostFacts {
    /// Whether systemd is running
    pub have_systemd: bool,
}

impl HostFacts {
    #[must_use]
    pub fn new(have_systemd: bool) -> Self {
        Self { have_systemd }
    }

    /// Check the host with `pidof systemd`.
    ///
    /// If the check cannot be run, systemd is assumed absent.
    pub async fn detect(runner: &dyn CommandRunner) -> Self {
        let argv = ["pidof".to_string(), "systemd".to_string()];
        let have_systemd = match runner.run_status(&argv).await {
            Ok(result) => result.success(),
            Err(e) => {
                warn!(error = %e, "unable to determine if systemd is present");
                false
            }
        };

        debug!(have_systemd, "systemd present");
        Self { have_systemd }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::Duration;

    use async_trait::async_trait;
    use gbp_support_exec::{CommandResult, ExecError};

    use super::*;

    struct PidofRunner {
        outcome: Result<i32, ExecError>,
    }

    #[async_trait]
    impl CommandRunner for PidofRunner {
        async fn run_captured(
            &self,
            argv: &[String],
            _sink: File,
        ) -> Result<CommandResult, ExecError> {
            self.run_status(argv).await
        }

        async fn run_status(&self, argv: &[String]) -> Result<CommandResult, ExecError> {
            assert_eq!(argv, ["pidof", "systemd"]);
            self.outcome.clone().map(|status| CommandResult {
                status,
                duration: Duration::from_millis(1),
            })
        }

        fn runner_type(&self) -> &'static str {
            "pidof"
        }
    }

    #[tokio::test]
    async fn test_detect_present() {
        let runner = PidofRunner { outcome: Ok(0) };
        assert!(HostFacts::detect(&runner).await.have_systemd);
    }

    #[tokio::test]
    async fn test_detect_absent() {
        let runner = PidofRunner { outcome: Ok(1) };
        assert!(!HostFacts::detect(&runner).await.have_systemd);
    }

    #[tokio::test]
    async fn test_detect_failure_defaults_absent() {
        let runner = PidofRunner {
            outcome: Err(ExecError::SpawnError("pidof: not found".to_string())),
        };
        assert_eq!(HostFacts::detect(&runner).await, HostFacts::new(false));
    }
}
