//! Action option list parsing and lookup

use std::collections::HashMap;
use std::fmt;

/// Placeholder token meaning "no options"
pub const NO_OPTIONS: &str = "-";

/// Option enabling recursion into matched directories (copy)
pub const OPT_RECURSIVE: &str = "recursive";

/// Option gating an action on service-manager presence
pub const OPT_HAVE_SYSTEMD: &str = "have_systemd";

/// Options attached to an action: `key` or `key=value` entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOptions {
    entries: HashMap<String, Option<String>>,
}

impl ActionOptions {
    /// Parse a comma-separated option token.
    ///
    /// Each entry splits on its first `=` only. Entries named `-` are dropped.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let entries = token
            .split(',')
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (entry.to_string(), None),
            })
            .filter(|(key, _)| key != NO_OPTIONS)
            .collect();

        Self { entries }
    }

    /// Whether `key` was given, with or without a value
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value for `key`, or `default` if the key is absent or has no value
    #[must_use]
    pub fn get<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str> {
        match self.entries.get(key) {
            Some(Some(value)) => Some(value.as_str()),
            _ => default,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Declared service-manager expectation, if the action has a usable one.
    ///
    /// Only `true`/`false` (any case) count; other values mean no condition.
    #[must_use]
    pub fn systemd_expectation(&self) -> Option<bool> {
        let value = self.get(OPT_HAVE_SYSTEMD, None)?;
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl fmt::Display for ActionOptions {
    /// Renders the option token; `-` when there are no options.
    /// Entry order follows sorted keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str(NO_OPTIONS);
        }

        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();

        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match &self.entries[key] {
                Some(value) => write!(f, "{key}={value}")?,
                None => f.write_str(key)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_empty() {
        let opts = ActionOptions::parse("-");
        assert!(opts.is_empty());
        assert_eq!(opts.to_string(), "-");
    }

    #[test]
    fn test_split_on_first_equals() {
        let opts = ActionOptions::parse("a,b=1,c=2=x");

        assert_eq!(opts.len(), 3);
        assert!(opts.has("a"));
        assert_eq!(opts.get("a", None), None);
        assert_eq!(opts.get("b", None), Some("1"));
        assert_eq!(opts.get("c", None), Some("2=x"));
    }

    #[test]
    fn test_get_with_default() {
        let opts = ActionOptions::parse("recursive");
        assert_eq!(opts.get("recursive", Some("no")), Some("no"));
        assert_eq!(opts.get("missing", Some("fallback")), Some("fallback"));
    }

    #[test]
    fn test_placeholder_dropped_among_others() {
        let opts = ActionOptions::parse("-,recursive");
        assert_eq!(opts.len(), 1);
        assert!(opts.has(OPT_RECURSIVE));
    }

    #[test]
    fn test_systemd_expectation() {
        assert_eq!(
            ActionOptions::parse("have_systemd=TRUE").systemd_expectation(),
            Some(true)
        );
        assert_eq!(
            ActionOptions::parse("have_systemd=false").systemd_expectation(),
            Some(false)
        );
        assert_eq!(
            ActionOptions::parse("have_systemd=maybe").systemd_expectation(),
            None
        );
        assert_eq!(ActionOptions::parse("have_systemd").systemd_expectation(), None);
        assert_eq!(ActionOptions::parse("-").systemd_expectation(), None);
    }

    #[test]
    fn test_display_sorted() {
        let opts = ActionOptions::parse("recursive,have_systemd=true");
        assert_eq!(opts.to_string(), "have_systemd=true,recursive");
    }
}
