//! Escaping of TEXT values and parameter values, and content line folding
//! (RFC 5545 §3.1, §3.2 and §3.3.11).

use crate::grammar::{is_name, is_qsafe_char};

/// Maximum length of a physical line in octets, excluding the line break.
pub const MAX_LINE_OCTETS: usize = 75;

const FOLD: &str = "\r\n ";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EscapeError {
    #[error("Bad escaped character '\\{character}' at position {position}")]
    BadEscape { character: char, position: usize },
    #[error("Unterminated escape sequence at position {0}")]
    DanglingEscape(usize),
    #[error("Parameter value must not contain DQUOTE (\").")]
    QuoteInParameter,
    #[error("Parameter value must not contain control character {0:?}.")]
    ControlInParameter(char),
    #[error("Invalid parameter name {0:?}.")]
    InvalidParameterName(String),
}

fn escape_with(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape special characters in a TEXT value.
///
/// Both CRLF and LF are converted to `\n`.
pub fn escape_text(value: &str) -> String {
    escape_with(value, &[',', ';', '\\'])
}

/// Escape a value of any other type. Only backslashes and line breaks are
/// escaped, `,` and `;` are part of those grammars and stay as they are.
pub fn escape_value(value: &str) -> String {
    escape_with(value, &['\\'])
}

/// Inverse of [`escape_text`].
///
/// Only `\,`, `\;`, `\\`, `\n` and `\N` are valid escapes. `\:` is not an RFC
/// escape and is rejected like any other character.
pub fn unescape_text(value: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().enumerate();
    while let Some((position, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, escaped @ (',' | ';' | '\\'))) => out.push(escaped),
            Some((_, 'n' | 'N')) => out.push('\n'),
            Some((_, character)) => {
                return Err(EscapeError::BadEscape {
                    character,
                    position,
                });
            }
            None => return Err(EscapeError::DanglingEscape(position)),
        }
    }
    Ok(out)
}

/// A parameter value must be `QSAFE-CHAR`s only.
pub(crate) fn check_parameter_value(value: &str) -> Result<(), EscapeError> {
    match value.chars().find(|&c| !is_qsafe_char(c)) {
        Some('"') => Err(EscapeError::QuoteInParameter),
        Some(c) => Err(EscapeError::ControlInParameter(c)),
        None => Ok(()),
    }
}

pub(crate) fn check_parameter_name(name: &str) -> Result<(), EscapeError> {
    if is_name(name) {
        Ok(())
    } else {
        Err(EscapeError::InvalidParameterName(name.to_owned()))
    }
}

/// Quote a parameter value if it contains `:`, `;` or `,`.
pub fn escape_parameter_value(value: &str) -> Result<String, EscapeError> {
    check_parameter_value(value)?;
    Ok(quote_parameter_value(value))
}

/// Caller guarantees `value` passed [`check_parameter_value`].
pub(crate) fn quote_parameter_value(value: &str) -> String {
    if value.contains([':', ';', ',']) {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}

/// Strip the surrounding quotes of a quoted parameter value.
pub fn unescape_parameter_value(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

/// Fold a content line into physical lines of at most [`MAX_LINE_OCTETS`]
/// octets. Lengths are counted in UTF-8 octets and a fold never splits a
/// character.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_owned();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * FOLD.len());
    let mut current_len = 0;
    for c in line.chars() {
        let char_len = c.len_utf8();
        if current_len + char_len > MAX_LINE_OCTETS {
            out.push_str(FOLD);
            // the leading space counts towards the next physical line
            current_len = 1;
        }
        out.push(c);
        current_len += char_len;
    }
    out
}

/// Remove every CRLF followed by a single space or tab.
pub fn unfold_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("\r\n") {
        let after = &rest[pos + 2..];
        if after.starts_with([' ', '\t']) {
            out.push_str(&rest[..pos]);
            rest = &after[1..];
        } else {
            out.push_str(&rest[..pos + 2]);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}
