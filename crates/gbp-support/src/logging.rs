//! Logging setup
//!
//! Everything is logged twice: to stderr, filtered for the operator, and to a
//! temporary run log that ends up inside the bundle.

use std::path::Path;
use std::sync::Mutex;

use color_eyre::Result;
use tempfile::NamedTempFile;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Temporary log file for the current run, deleted when dropped
pub struct RunLog {
    file: NamedTempFile,
}

impl RunLog {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Console and run-log levels for the requested verbosity
fn levels(verbose: bool) -> (LevelFilter, LevelFilter) {
    if verbose {
        (LevelFilter::DEBUG, LevelFilter::DEBUG)
    } else {
        (LevelFilter::ERROR, LevelFilter::INFO)
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the console level.
pub fn init(verbose: bool) -> Result<RunLog> {
    let (console_level, file_level) = levels(verbose);

    let file = tempfile::Builder::new()
        .prefix("gbp-support-")
        .suffix(".log")
        .tempfile()?;
    let writer = file.as_file().try_clone()?;

    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(writer))
                .with_ansi(false)
                .with_target(false)
                .with_filter(file_level),
        )
        .try_init()?;

    Ok(RunLog { file })
}
