//! Splits a SQL script into individual statements.
//!
//! The splitter is a single forward scan that tracks whether it is inside
//! a quoted literal (`'...'`, `"..."` or `` `...` ``). Outside literals it
//! recognizes the delimiter, `--` line comments and `/* */` block
//! comments. Comments are dropped, runs of whitespace collapse to a single
//! space, and empty statements are skipped. A doubled quote (`'it''s'`)
//! closes and reopens the literal, which keeps its text intact.
//!
//! Backslash is not an escape character; SQLite and standard SQL both
//! escape quotes by doubling them.
//!
//! A delimiter that starts or ends with a word character (`GO`) only
//! matches on a word boundary, so `CATEGORY` is never split.
//!
//! ```
//! # use commander_scripts::split_statements;
//! let statements = split_statements("INSERT INTO t VALUES ('a;b'); -- done\nSELECT 1", ";").unwrap();
//! assert_eq!(statements, vec!["INSERT INTO t VALUES ('a;b')", "SELECT 1"]);
//! ```

use thiserror::Error;

/// Errors raised while splitting a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// A `/*` comment is never closed.
    #[error("unterminated block comment starting on line {line}")]
    UnterminatedComment {
        /// One-based line of the opening `/*`.
        line: usize,
    },
}

/// Splits `script` on `delimiter`, honoring literals and comments.
///
/// # Errors
///
/// Returns [`SplitError::UnterminatedComment`] if a block comment is not
/// closed before the end of the script.
pub fn split_statements(script: &str, delimiter: &str) -> Result<Vec<String>, SplitError> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < script.len() {
        let rest = &script[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if let Some(open) = quote {
            current.push(c);
            if c == open {
                quote = None;
            }
            i += c.len_utf8();
            continue;
        }

        if !delimiter.is_empty()
            && rest.starts_with(delimiter)
            && on_word_boundary(script, i, delimiter)
        {
            finish_statement(&mut statements, &mut current);
            i += delimiter.len();
            continue;
        }

        if rest.starts_with("--") {
            // Leave the newline in place; it is handled as whitespace.
            i += rest.find('\n').unwrap_or(rest.len());
            continue;
        }

        if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(end) => {
                    push_space(&mut current);
                    i += 2 + end + 2;
                    continue;
                }
                None => {
                    return Err(SplitError::UnterminatedComment {
                        line: line_of(script, i),
                    });
                }
            }
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            c if c.is_whitespace() => push_space(&mut current),
            c => current.push(c),
        }
        i += c.len_utf8();
    }

    finish_statement(&mut statements, &mut current);
    Ok(statements)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Checks that a delimiter found at `offset` is not part of a longer word.
fn on_word_boundary(script: &str, offset: usize, delimiter: &str) -> bool {
    let before = script[..offset].chars().next_back();
    let after = script[offset + delimiter.len()..].chars().next();
    let starts_word = delimiter.starts_with(is_word_char);
    let ends_word = delimiter.ends_with(is_word_char);
    !(starts_word && before.is_some_and(is_word_char))
        && !(ends_word && after.is_some_and(is_word_char))
}

fn push_space(current: &mut String) {
    if !current.is_empty() && !current.ends_with(' ') {
        current.push(' ');
    }
}

fn finish_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

fn line_of(script: &str, offset: usize) -> usize {
    script[..offset].matches('\n').count() + 1
}
