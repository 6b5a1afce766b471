//! End-to-end collection run

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gbp_support_exec::{CommandRunner, LocalRunner};
use tracing::{debug, error, info, instrument, warn};

use crate::archive::BundleArchive;
use crate::config::CollectorConfig;
use crate::error::CoreError;
use crate::executor::{ActionExecutor, ActionOutcome};
use crate::host::HostFacts;
use crate::loader::load_actions;

/// Archive name of the run's own log
pub const RUN_LOG_NAME: &str = "support.log";

/// Summary of a finished collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    /// Where the finished archive was written
    pub archive: PathBuf,
    /// Actions loaded from the definition files
    pub actions: usize,
    pub copied: usize,
    pub captured: usize,
    pub skipped: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl CollectionReport {
    fn record(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Copied { .. } => self.copied += 1,
            ActionOutcome::Captured { .. } => self.captured += 1,
            ActionOutcome::Skipped => self.skipped += 1,
            ActionOutcome::Failed => self.failed += 1,
            ActionOutcome::Ignored => self.ignored += 1,
        }
    }
}

/// Collector
///
/// Loads the action files, runs every action into a fresh archive, and
/// closes the archive with the run log attached.
pub struct SupportCollector {
    config: CollectorConfig,
    runner: Arc<dyn CommandRunner>,
    host: Option<HostFacts>,
}

impl SupportCollector {
    /// Create a collector that runs commands locally
    pub fn new(config: CollectorConfig) -> Self {
        let runner = match config.command_timeout {
            Some(timeout) => LocalRunner::new().with_timeout(timeout),
            None => LocalRunner::new(),
        };
        Self {
            config,
            runner: Arc::new(runner),
            host: None,
        }
    }

    /// Use a different command runner
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use fixed host facts instead of probing the host
    #[must_use]
    pub fn with_host_facts(mut self, host: HostFacts) -> Self {
        self.host = Some(host);
        self
    }

    /// Run the whole collection, attaching `run_log` as the last entry.
    ///
    /// # Errors
    /// Returns `CoreError::ArchiveOpen` if the archive cannot be created (no
    /// action runs in that case), or `CoreError::ArchiveWrite` if it cannot be
    /// finalized. Failures of individual actions are only logged.
    #[instrument(skip(self, run_log), fields(input = %self.config.input_dir.display()))]
    pub async fn collect(&self, run_log: &Path) -> Result<CollectionReport, CoreError> {
        let actions = load_actions(&self.config.input_dir);

        let mut archive =
            match BundleArchive::create(&self.config.output_dir, self.config.filename.as_deref()) {
                Ok(archive) => archive,
                Err(e) => {
                    error!(error = %e, "unable to create archive");
                    return Err(e);
                }
            };

        let host = match self.host {
            Some(host) => host,
            None => HostFacts::detect(self.runner.as_ref()).await,
        };
        let executor = ActionExecutor::new(Arc::clone(&self.runner), host);

        debug!(
            count = actions.len(),
            runner = self.runner.runner_type(),
            "number of actions to execute"
        );

        let mut report = CollectionReport {
            actions: actions.len(),
            ..CollectionReport::default()
        };
        for action in &actions {
            let outcome = executor.execute(action, &mut archive).await;
            report.record(&outcome);
            tokio::task::yield_now().await;
        }

        info!(
            actions = report.actions,
            copied = report.copied,
            captured = report.captured,
            skipped = report.skipped,
            failed = report.failed,
            ignored = report.ignored,
            entries = archive.entries(),
            "collection finished"
        );

        if let Err(e) = archive.append_file(run_log, Path::new(RUN_LOG_NAME)) {
            warn!(error = %e, "unable to attach run log");
        }

        report.archive = archive
            .finish()
            .inspect_err(|e| error!(error = %e, "unable to close archive"))?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tally() {
        let mut report = CollectionReport::default();
        for outcome in [
            ActionOutcome::Copied { entries: 2 },
            ActionOutcome::Captured { status: Some(1) },
            ActionOutcome::Captured { status: None },
            ActionOutcome::Skipped,
            ActionOutcome::Failed,
            ActionOutcome::Ignored,
        ] {
            report.record(&outcome);
        }

        assert_eq!(report.copied, 1);
        assert_eq!(report.captured, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.ignored, 1);
    }

    #[tokio::test]
    async fn test_archive_open_failure_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        std::fs::write(&log, "").unwrap();

        let config = CollectorConfig::default()
            .with_input_dir(dir.path())
            .with_output_dir(dir.path().join("missing"));
        let collector = SupportCollector::new(config).with_host_facts(HostFacts::new(false));

        let result = collector.collect(&log).await;
        assert!(matches!(result, Err(CoreError::ArchiveOpen { .. })));
    }
}
