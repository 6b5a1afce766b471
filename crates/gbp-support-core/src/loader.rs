//! Discovery and parsing of action definition files

use std::fs;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob_with};
use tracing::{debug, instrument, warn};

use crate::action::{Action, ParsedLine};
use crate::config::{ACTION_FILE_PATTERN, GLOB_OPTIONS};
use crate::error::CoreError;

/// Parse every action line of one definition file, in file order.
///
/// Malformed lines are logged and skipped.
///
/// # Errors
/// Returns `CoreError::ActionFileRead` if the file cannot be read.
pub fn parse_file(path: &Path) -> Result<Vec<Action>, CoreError> {
    debug!(path = %path.display(), "parsing action file");

    let bytes = fs::read(path).map_err(|e| CoreError::ActionFileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let mut actions = Vec::new();
    for (index, line) in content.lines().enumerate() {
        match Action::parse_line(line) {
            ParsedLine::Action(action) => actions.push(action),
            ParsedLine::Malformed => {
                debug!(path = %path.display(), line = index + 1, text = %line, "ignoring unknown line");
            }
            ParsedLine::Blank | ParsedLine::Comment => {}
        }
    }

    debug!(path = %path.display(), count = actions.len(), "found actions");
    Ok(actions)
}

/// Find the action definition files in `dir`
///
/// # Errors
/// Returns `CoreError::InvalidPattern` if the search pattern cannot be built.
pub fn find_action_files(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join(ACTION_FILE_PATTERN);
    let pattern = pattern.to_string_lossy();

    let mut files = Vec::new();
    let entries =
        glob_with(&pattern, GLOB_OPTIONS).map_err(|e| CoreError::InvalidPattern(e.to_string()))?;
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!(error = %e, "error accessing path"),
        }
    }
    Ok(files)
}

/// Load actions from every definition file in `dir`.
///
/// A file that cannot be read is logged and skipped; a missing directory
/// yields no actions.
#[instrument]
pub fn load_actions(dir: &Path) -> Vec<Action> {
    debug!("looking for action files");

    let files = match find_action_files(dir) {
        Ok(files) => files,
        Err(e) => {
            warn!(error = %e, "unable to search for action files");
            return Vec::new();
        }
    };

    let mut actions = Vec::new();
    for file in files {
        match parse_file(&file) {
            Ok(parsed) => actions.extend(parsed),
            Err(e) => warn!(error = %e, "error while parsing action file"),
        }
    }
    actions
}
