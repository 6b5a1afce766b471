//! Shell-style word splitting for command lines

use crate::error::ExecError;

/// Split a command line into program and arguments using POSIX shell quoting
/// rules. No expansion or redirection is performed.
///
/// # Errors
/// Returns `ExecError::InvalidCommandLine` on unbalanced quotes or a trailing
/// escape, and `ExecError::EmptyCommand` if no words remain.
pub fn split_command(cmd: &str) -> Result<Vec<String>, ExecError> {
    let words = shlex::split(&escape_comment_marks(cmd))
        .ok_or_else(|| ExecError::InvalidCommandLine(cmd.to_string()))?;
    if words.is_empty() {
        return Err(ExecError::EmptyCommand);
    }
    Ok(words)
}

/// Backslash-escape every unquoted `#` that starts a word.
///
/// `shlex` treats such a `#` as the start of a comment; here it is literal.
fn escape_comment_marks(cmd: &str) -> String {
    let mut out = String::with_capacity(cmd.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut word_start = true;

    for c in cmd.chars() {
        if escaped {
            escaped = false;
        } else {
            match quote {
                Some(q) if c == q => quote = None,
                Some('"') if c == '\\' => escaped = true,
                Some(_) => {}
                None => match c {
                    '\\' => escaped = true,
                    '\'' | '"' => quote = Some(c),
                    '#' if word_start => out.push('\\'),
                    _ => {}
                },
            }
        }
        out.push(c);
        word_start = quote.is_none() && !escaped && c.is_whitespace();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_words() {
        let argv = split_command("ip -d addr show").unwrap();
        assert_eq!(argv, vec!["ip", "-d", "addr", "show"]);
    }

    #[test]
    fn test_split_quoted_argument() {
        let argv = split_command(r#"grep -r "foo bar" '/var/log/my app'"#).unwrap();
        assert_eq!(argv, vec!["grep", "-r", "foo bar", "/var/log/my app"]);
    }

    #[test]
    fn test_split_keeps_shell_operators_literal() {
        let argv = split_command("echo a|b > c").unwrap();
        assert_eq!(argv, vec!["echo", "a|b", ">", "c"]);
    }

    #[test]
    fn test_split_hash_is_literal() {
        let argv = split_command("echo #hi there").unwrap();
        assert_eq!(argv, vec!["echo", "#hi", "there"]);

        let argv = split_command("#notacomment -x").unwrap();
        assert_eq!(argv, vec!["#notacomment", "-x"]);
    }

    #[test]
    fn test_split_hash_inside_quotes_and_words() {
        let argv = split_command(r##"grep -e '# x' "#y" a#b \#c"##).unwrap();
        assert_eq!(argv, vec!["grep", "-e", "# x", "#y", "a#b", "#c"]);
    }

    #[test]
    fn test_split_unbalanced_quote() {
        let result = split_command("echo 'oops");
        assert!(matches!(result, Err(ExecError::InvalidCommandLine(_))));
    }

    #[test]
    fn test_split_blank() {
        assert!(matches!(split_command("   "), Err(ExecError::EmptyCommand)));
    }
}
