//! gbp-support
//!
//! Collects the files and command output described by `*.gbp` action files
//! into a single compressed support bundle.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use gbp_support_core::{CollectorConfig, SupportCollector};
use tracing::{info, warn};

mod cli;
mod logging;

/// Exit status after Ctrl-C, as a shell would report it
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = cli::Args::parse();
    let run_log = logging::init(args.verbose)?;

    let code = tokio::select! {
        code = run(args.collector_config(), run_log.path()) => code,
        () = interrupted() => {
            // The unfinished collection has been dropped: its archive file is
            // removed and any running command killed.
            info!("Ctrl-c pressed, exiting");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    };

    drop(run_log);
    Ok(code)
}

async fn run(config: CollectorConfig, run_log: &Path) -> ExitCode {
    let collector = SupportCollector::new(config);

    match collector.collect(run_log).await {
        Ok(report) => {
            println!(
                "GBP support information collected in file {}",
                report.archive.display()
            );
            ExitCode::SUCCESS
        }
        // Already logged by the collector
        Err(_) => ExitCode::FAILURE,
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
