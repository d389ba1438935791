//! `Exec` key tokenising and field-code expansion.
//!
//! Follows the Desktop Entry specification: arguments are separated by
//! spaces, may be double-quoted, and inside quotes `\"`, `` \` ``, `\$` and
//! `\\` are escapes. Field codes are expanded after tokenising, so a quoted
//! `"%u"` is still a literal argument with the code replaced in place.
//!
//! Arguments are `OsString`s: `%f` and `%F` paths are decoded from their
//! `file://` URIs byte for byte and need not be UTF-8.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while expanding an `Exec` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// A double quote was opened and never closed.
    #[error("unterminated quote in Exec value")]
    UnterminatedQuote,
    /// The value expanded to no program at all.
    #[error("Exec value is empty")]
    Empty,
}

/// Entry fields referenced by `%i`, `%c` and `%k`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSource<'a> {
    pub name: &'a str,
    pub icon: Option<&'a str>,
    pub location: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(exec: &str) -> Result<Vec<Token>, ExecError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut pending = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => in_quotes = false,
                '\\' => match chars.next() {
                    Some(escaped @ ('"' | '`' | '$' | '\\')) => current.push(escaped),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => return Err(ExecError::UnterminatedQuote),
                },
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quoted = true;
                pending = true;
            }
            ' ' | '\t' => {
                if pending {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                    quoted = false;
                    pending = false;
                }
            }
            _ => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err(ExecError::UnterminatedQuote);
    }
    if pending {
        tokens.push(Token { text: current, quoted });
    }

    Ok(tokens)
}

/// Converts `file://` URIs to local paths; other URIs pass through unchanged.
fn to_local_path(uri: &str) -> OsString {
    url::Url::parse(uri)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .map_or_else(|| OsString::from(uri), PathBuf::into_os_string)
}

/// Expands an `Exec` value into an argument vector for `targets`.
///
/// # Errors
///
/// Returns [`ExecError::UnterminatedQuote`] for malformed quoting and
/// [`ExecError::Empty`] when no program remains after expansion.
pub fn expand(exec: &str, source: &FieldSource<'_>, targets: &[String]) -> Result<Vec<OsString>, ExecError> {
    let mut argv = Vec::new();

    for token in tokenize(exec)? {
        if !token.quoted {
            match token.text.as_str() {
                "%U" => {
                    argv.extend(targets.iter().map(OsString::from));
                    continue;
                }
                "%F" => {
                    argv.extend(targets.iter().map(|uri| to_local_path(uri)));
                    continue;
                }
                "%i" => {
                    if let Some(icon) = source.icon.filter(|icon| !icon.is_empty()) {
                        argv.push("--icon".into());
                        argv.push(icon.into());
                    }
                    continue;
                }
                _ => {}
            }
        }

        let (text, had_code) = expand_inline(&token.text, source, targets);
        // An unquoted argument made only of codes that expanded to nothing disappears
        if text.is_empty() && had_code && !token.quoted {
            continue;
        }
        argv.push(text);
    }

    if argv.is_empty() {
        return Err(ExecError::Empty);
    }

    Ok(argv)
}

fn expand_inline(text: &str, source: &FieldSource<'_>, targets: &[String]) -> (OsString, bool) {
    let mut out = OsString::with_capacity(text.len());
    let mut had_code = false;
    let mut chars = text.chars();
    let mut buf = [0; 4];

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(&*c.encode_utf8(&mut buf));
            continue;
        }
        had_code = true;
        match chars.next() {
            Some('%') => out.push("%"),
            Some('u') => {
                if let Some(first) = targets.first() {
                    out.push(first);
                }
            }
            Some('f') => {
                if let Some(first) = targets.first() {
                    out.push(to_local_path(first));
                }
            }
            Some('c') => out.push(source.name),
            Some('k') => out.push(source.location),
            // %U, %F and %i are only valid as standalone arguments; deprecated
            // and unknown codes are dropped
            Some(_) | None => {}
        }
    }

    (out, had_code)
}
