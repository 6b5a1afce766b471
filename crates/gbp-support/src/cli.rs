//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use gbp_support_core::CollectorConfig;
use gbp_support_core::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};

/// Collect GBP support information into a single archive
#[derive(Parser, Debug)]
#[command(name = "gbp-support", version, about)]
pub struct Args {
    /// Directory to read support information files from
    #[arg(short = 'i', long = "inputdir", value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Directory to create the support bundle in
    #[arg(short = 'o', long = "outputdir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Use specified name for the bundle file instead of generating one
    #[arg(short = 'f', long = "filename", value_name = "NAME")]
    pub filename: Option<String>,

    /// Kill any command running longer than this many seconds
    #[arg(short = 't', long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Use verbose logging while creating the bundle
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    /// Collector settings for these arguments
    pub fn collector_config(&self) -> CollectorConfig {
        let mut config = CollectorConfig::default()
            .with_input_dir(&self.input_dir)
            .with_output_dir(&self.output_dir);
        if let Some(name) = &self.filename {
            config = config.with_filename(name);
        }
        if let Some(secs) = self.timeout {
            config = config.with_command_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["gbp-support"]).unwrap();
        assert_eq!(args.input_dir, PathBuf::from("/etc/gbp-support/"));
        assert_eq!(args.output_dir, PathBuf::from("/tmp"));
        assert!(args.filename.is_none());
        assert!(!args.verbose);

        let config = args.collector_config();
        assert!(config.filename.is_none());
        assert!(config.command_timeout.is_none());
    }

    #[test]
    fn test_short_and_long_flags() {
        let args = Args::try_parse_from([
            "gbp-support",
            "-i",
            "/srv/gbp",
            "--outputdir",
            "/var/tmp",
            "-f",
            "case-1234.tar.gz",
            "--timeout",
            "60",
            "--verbose",
        ])
        .unwrap();

        assert!(args.verbose);
        let config = args.collector_config();
        assert_eq!(config.input_dir, PathBuf::from("/srv/gbp"));
        assert_eq!(config.output_dir, PathBuf::from("/var/tmp"));
        assert_eq!(config.filename.as_deref(), Some("case-1234.tar.gz"));
        assert_eq!(config.command_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Args::try_parse_from(["gbp-support", "--bogus"]).is_err());
    }
}
