//! Collector configuration

use std::path::PathBuf;
use std::time::Duration;

use glob::MatchOptions;

/// Directory searched for action definition files when none is given
pub const DEFAULT_INPUT_DIR: &str = "/etc/gbp-support/";

/// Directory the bundle is written to when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp";

/// Glob matching action definition files inside the input directory
pub const ACTION_FILE_PATTERN: &str = "*.gbp";

/// Glob rules for action files and copy patterns; wildcards skip dotfiles
pub const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Settings for a single collection run
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Directory holding `*.gbp` action files
    pub input_dir: PathBuf,
    /// Directory the archive is created in
    pub output_dir: PathBuf,
    /// Archive file name; generated from host name and time when unset
    pub filename: Option<String>,
    /// Kill commands running longer than this
    pub command_timeout: Option<Duration>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filename: None,
            command_timeout: None,
        }
    }
}

impl CollectorConfig {
    /// Set the action file directory
    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Use a fixed archive file name
    #[must_use]
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    /// Set the per-command timeout
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}
