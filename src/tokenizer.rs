//! Splitting of raw command lines into argument tokens.
//!
//! The shell has no quoting, escaping or substitution: a line is cut on a fixed
//! set of delimiter characters and every other character, quotes included, is
//! kept verbatim.

/// Characters that separate tokens: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Splits `line` into whitespace-delimited tokens.
///
/// Runs of consecutive delimiters are collapsed, so no empty tokens are ever
/// produced. A blank line (or one consisting only of delimiters) yields an empty
/// vector. The first token, if any, is the command name.
///
/// Tokens are owned copies, so the result may outlive the line it came from.
///
/// Example
/// ```
/// use minishell::tokenizer::split_line;
/// assert_eq!(split_line("ls -la   foo"), vec!["ls", "-la", "foo"]);
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    line.split(is_delimiter)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(&ch)
}
