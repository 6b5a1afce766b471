//! Action records and the line grammar they are parsed from
//!
//! Each non-blank, non-comment line of an action file has the shape
//! `<operation> <options> <arguments...>`, where the arguments run to the end
//! of the line and may contain whitespace.

use std::fmt;

use crate::options::ActionOptions;

/// What an action does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Add files matching a glob to the archive
    Copy,
    /// Run a command and archive its combined output
    Exec,
    /// Unrecognized token, kept so it can be reported when the run reaches it
    Unknown(String),
}

impl Operation {
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "copy" => Operation::Copy,
            "exec" => Operation::Exec,
            other => Operation::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Copy => "copy",
            Operation::Exec => "exec",
            Operation::Unknown(token) => token,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of collection work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub operation: Operation,
    pub options: ActionOptions,
    /// Glob pattern for `Copy`, full command line for `Exec`
    pub arguments: String,
}

/// Classification of a single action-file line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Blank,
    Comment,
    Action(Action),
    /// Not three whitespace-separated fields
    Malformed,
}

impl Action {
    pub fn new(operation: Operation, options: ActionOptions, arguments: impl Into<String>) -> Self {
        Self {
            operation,
            options,
            arguments: arguments.into(),
        }
    }

    /// Parse one line of an action file
    #[must_use]
    pub fn parse_line(line: &str) -> ParsedLine {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return ParsedLine::Blank;
        }
        if trimmed.starts_with('#') {
            return ParsedLine::Comment;
        }

        let Some((operation, rest)) = next_field(trimmed) else {
            return ParsedLine::Malformed;
        };
        let Some((options, rest)) = next_field(rest) else {
            return ParsedLine::Malformed;
        };
        let arguments = rest.trim();
        if arguments.is_empty() {
            return ParsedLine::Malformed;
        }

        ParsedLine::Action(Action::new(
            Operation::from_token(operation),
            ActionOptions::parse(options),
            arguments,
        ))
    }
}

/// Split off the leading run of non-whitespace, which must be followed by more text
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace)?;
    Some((&s[..end], &s[end..]))
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operation, self.options, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_action(line: &str) -> Action {
        match Action::parse_line(line) {
            ParsedLine::Action(action) => action,
            other => panic!("expected action for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_copy() {
        let action = parse_action("copy recursive /var/log/neutron/*");
        assert_eq!(action.operation, Operation::Copy);
        assert!(action.options.has("recursive"));
        assert_eq!(action.arguments, "/var/log/neutron/*");
    }

    #[test]
    fn test_arguments_keep_inner_whitespace() {
        let action = parse_action("  exec   have_systemd=true   journalctl -u agent  --no-pager\n");
        assert_eq!(action.operation, Operation::Exec);
        assert_eq!(action.options.systemd_expectation(), Some(true));
        assert_eq!(action.arguments, "journalctl -u agent  --no-pager");
    }

    #[test]
    fn test_arguments_may_contain_equals_and_commas() {
        let action = parse_action("exec - ovs-vsctl --format=csv list a,b");
        assert!(action.options.is_empty());
        assert_eq!(action.arguments, "ovs-vsctl --format=csv list a,b");
    }

    #[test]
    fn test_round_trip() {
        for line in [
            "copy - /etc/hostname",
            "exec have_systemd=false service --status-all",
            "copy recursive /etc/opflex-agent-ovs",
        ] {
            assert_eq!(parse_action(line).to_string(), line);
        }
    }

    #[test]
    fn test_comments_and_blanks() {
        assert_eq!(Action::parse_line(""), ParsedLine::Blank);
        assert_eq!(Action::parse_line("   \t\n"), ParsedLine::Blank);
        assert_eq!(Action::parse_line("# copy - /etc/hostname"), ParsedLine::Comment);
        assert_eq!(Action::parse_line("    #indented"), ParsedLine::Comment);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(Action::parse_line("copy"), ParsedLine::Malformed);
        assert_eq!(Action::parse_line("copy -"), ParsedLine::Malformed);
        assert_eq!(Action::parse_line("copy -   \n"), ParsedLine::Malformed);
    }

    #[test]
    fn test_unknown_operation_preserved() {
        let action = parse_action("frobnicate - x");
        assert_eq!(action.operation, Operation::Unknown("frobnicate".to_string()));
        assert_eq!(action.arguments, "x");
    }

    #[test]
    fn test_operation_tokens_are_case_sensitive() {
        assert_eq!(
            Operation::from_token("COPY"),
            Operation::Unknown("COPY".to_string())
        );
    }
}
