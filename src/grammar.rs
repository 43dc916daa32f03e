//! Character classes and value grammars from RFC 5545.
//!
//! The character predicates drive the content line tokenizer, the patterns are
//! used by the value validators. Every pattern is anchored and matches a whole
//! value; composite grammars (e.g. PERIOD) are built from the named patterns
//! in code rather than by splicing regex sources together.

use lazy_static::lazy_static;
use regex::Regex;

/// `CONTROL = %x00-08 / %x0A-1F / %x7F`
#[inline]
pub fn is_control(c: char) -> bool {
    matches!(c, '\x00'..='\x08' | '\x0A'..='\x1F' | '\x7F')
}

/// Characters allowed in property and parameter names (`iana-token` / `x-name`).
#[inline]
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// `VALUE-CHAR`, HTAB or anything from space upwards.
#[inline]
pub fn is_value_char(c: char) -> bool {
    c == '\t' || c >= '\x20'
}

/// `SAFE-CHAR`: any character except CONTROL, DQUOTE, ";", ":" and ",".
#[inline]
pub fn is_safe_char(c: char) -> bool {
    !is_control(c) && !matches!(c, '"' | ';' | ':' | ',')
}

/// `QSAFE-CHAR`: any character except CONTROL and DQUOTE.
#[inline]
pub fn is_qsafe_char(c: char) -> bool {
    !is_control(c) && c != '"'
}

/// Whether a parameter value matches `paramtext / quoted-string`.
pub fn is_param_value(value: &str) -> bool {
    match value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(quoted) => quoted.chars().all(is_qsafe_char),
        None => value.chars().all(is_safe_char),
    }
}

/// Whether a name matches `iana-token / x-name`.
pub fn is_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

lazy_static! {
    pub static ref BINARY: Regex =
        Regex::new(r"^(?:[0-9a-zA-Z+/]{4})*(?:[0-9a-zA-Z+/]{2}==|[0-9a-zA-Z+/]{3}=)?$").unwrap();
    pub static ref BOOLEAN: Regex = Regex::new(r"^(?i:TRUE|FALSE)$").unwrap();
    pub static ref DATE: Regex = Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})$").unwrap();
    pub static ref DATE_TIME: Regex = Regex::new(
        r"^([0-9]{4})([0-9]{2})([0-9]{2})T([0-9]{2})([0-9]{2})([0-9]{2})(Z)?$"
    )
    .unwrap();
    pub static ref DURATION: Regex = Regex::new(
        r"^[+-]?P(?:[0-9]+W|[0-9]+D(?:T(?:[0-9]+H(?:[0-9]+M(?:[0-9]+S)?)?|[0-9]+M(?:[0-9]+S)?|[0-9]+S))?|T(?:[0-9]+H(?:[0-9]+M(?:[0-9]+S)?)?|[0-9]+M(?:[0-9]+S)?|[0-9]+S))$"
    )
    .unwrap();
    pub static ref FLOAT: Regex = Regex::new(r"^[+-]?[0-9]+(?:\.[0-9]+)?$").unwrap();
    pub static ref INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
    /// TEXT after unescaping: no control characters apart from HTAB and LF.
    pub static ref TEXT: Regex = Regex::new(r"^(?:[\t\n\x20-\x7E]|[^\x00-\x7F])*$").unwrap();
    pub static ref TIME: Regex = Regex::new(r"^[0-9]{6}Z?$").unwrap();
    pub static ref URI: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\x00-\x20\x7F]*$").unwrap();
    pub static ref UTC_OFFSET: Regex = Regex::new(r"^[+-](?:[0-9]{2}){2,3}$").unwrap();
}

/// `period = period-explicit / period-start`, i.e. `date-time "/" (date-time / dur-value)`.
pub fn is_period(value: &str) -> bool {
    let Some((start, end)) = value.split_once('/') else {
        return false;
    };
    DATE_TIME.is_match(start) && (DATE_TIME.is_match(end) || DURATION.is_match(end))
}
