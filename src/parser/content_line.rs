//! Tokenize content lines into properties.
//!
//! A content line is `name *(";" param) ":" value`. The tokenizer walks the
//! line one character at a time through the states [`TokenizerState::Name`],
//! [`TokenizerState::ParamName`], [`TokenizerState::ParamValue`] and
//! [`TokenizerState::Value`]. Names and parameter keys are uppercased, the
//! value is unescaped and quoted parameter values lose their quotes.
//!
//! # Examples
//!
//! ```rust
//! let input = "BEGIN:VEVENT\r\nSUMMARY;LANGUAGE=en:Lunch\\, again\r\nEND:VEVENT\r\n";
//!
//! for prop in ical_codec::ContentLineParser::from_slice(input.as_bytes()) {
//!     let prop = prop.unwrap();
//!     println!("{}: {}", prop.name(), prop.value);
//! }
//! ```

use derive_more::Display;
use std::borrow::Cow;
use std::iter::Iterator;

use super::{BytesLines, Line, LineError, LineReader};
use crate::{
    PARAM_DELIMITER, PARAM_NAME_DELIMITER, PARAM_QUOTE, PARAM_VALUE_DELIMITER, VALUE_DELIMITER,
    grammar::{is_name_char, is_qsafe_char, is_safe_char, is_value_char},
    property::{
        Parameters, Property,
        escape::{EscapeError, unescape_parameter_value, unescape_text},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    #[display("property name")]
    Name,
    #[display("parameter name")]
    ParamName,
    #[display("parameter value")]
    ParamValue,
    #[display("value")]
    Value,
}

/// Error arising when trying to parse a content line
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ContentLineError {
    #[error("Line {0}: Missing property name.")]
    MissingName(usize),
    #[error("Line {0}: Missing a closing quote.")]
    MissingClosingQuote(usize),
    #[error("Line {0}: Missing a \"{1}\" delimiter.")]
    MissingDelimiter(usize, char),
    #[error("Line {0}: Missing a parameter key.")]
    MissingParamKey(usize),
    #[error("Line {line}: Invalid character {character:?} at column {column} in {state}.")]
    InvalidCharacter {
        line: usize,
        column: usize,
        character: char,
        state: TokenizerState,
    },
    #[error("Line {0}: {1}")]
    InvalidEscape(usize, #[source] EscapeError),
    #[error("Line {0}: Tokenizer reached an inconsistent state.")]
    InconsistentState(usize),
    #[error(transparent)]
    LineError(#[from] LineError),
}

#[derive(Default)]
struct Tokenizer {
    name: String,
    param_name: String,
    param_value: String,
    param_values: Vec<String>,
    params: Vec<(String, Vec<String>)>,
    value: String,
    /// Inside a quoted parameter value.
    quoted: bool,
    /// The current parameter value was quoted and its closing quote was seen.
    closed: bool,
}

impl Tokenizer {
    fn flush_param_value(&mut self) {
        let value = std::mem::take(&mut self.param_value);
        self.param_values.push(unescape_parameter_value(&value).to_owned());
        self.closed = false;
    }

    fn flush_param(&mut self, line: usize) -> Result<(), ContentLineError> {
        self.flush_param_value();
        if self.param_name.is_empty() {
            return Err(ContentLineError::InconsistentState(line));
        }
        let key = std::mem::take(&mut self.param_name).to_ascii_uppercase();
        let values = std::mem::take(&mut self.param_values);
        match self.params.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => existing.extend(values),
            None => self.params.push((key, values)),
        }
        Ok(())
    }
}

/// Tokenize a single unfolded content line. `number` is only used in errors.
pub fn parse_content_line(line: &str, number: usize) -> Result<Property, ContentLineError> {
    let mut state = TokenizerState::Name;
    let mut tok = Tokenizer::default();

    for (column, c) in line.chars().enumerate() {
        let invalid = move || ContentLineError::InvalidCharacter {
            line: number,
            column: column + 1,
            character: c,
            state,
        };
        match state {
            TokenizerState::Name => match c {
                PARAM_DELIMITER | VALUE_DELIMITER if tok.name.is_empty() => {
                    return Err(ContentLineError::MissingName(number));
                }
                PARAM_DELIMITER => state = TokenizerState::ParamName,
                VALUE_DELIMITER => state = TokenizerState::Value,
                c if is_name_char(c) => tok.name.push(c),
                _ => return Err(invalid()),
            },
            TokenizerState::ParamName => match c {
                PARAM_NAME_DELIMITER if tok.param_name.is_empty() => {
                    return Err(ContentLineError::MissingParamKey(number));
                }
                PARAM_NAME_DELIMITER => state = TokenizerState::ParamValue,
                c if is_name_char(c) => tok.param_name.push(c),
                _ => return Err(invalid()),
            },
            TokenizerState::ParamValue if tok.quoted => match c {
                PARAM_QUOTE => {
                    tok.param_value.push(c);
                    tok.quoted = false;
                    tok.closed = true;
                }
                c if is_qsafe_char(c) => tok.param_value.push(c),
                _ => return Err(invalid()),
            },
            TokenizerState::ParamValue => match c {
                PARAM_QUOTE if tok.param_value.is_empty() && !tok.closed => {
                    tok.param_value.push(c);
                    tok.quoted = true;
                }
                PARAM_VALUE_DELIMITER => tok.flush_param_value(),
                PARAM_DELIMITER => {
                    tok.flush_param(number)?;
                    state = TokenizerState::ParamName;
                }
                VALUE_DELIMITER => {
                    tok.flush_param(number)?;
                    state = TokenizerState::Value;
                }
                // nothing may follow the closing quote but a delimiter
                _ if tok.closed => return Err(invalid()),
                c if is_safe_char(c) => tok.param_value.push(c),
                _ => return Err(invalid()),
            },
            TokenizerState::Value => match c {
                // left over from a fold that was not stripped
                '\r' | '\n' => tok.value.push(c),
                c if is_value_char(c) => tok.value.push(c),
                _ => return Err(invalid()),
            },
        }
    }

    match state {
        TokenizerState::Value => {}
        TokenizerState::Name if tok.name.is_empty() => {
            return Err(ContentLineError::MissingName(number));
        }
        TokenizerState::ParamValue if tok.quoted => {
            return Err(ContentLineError::MissingClosingQuote(number));
        }
        TokenizerState::ParamName if tok.param_name.is_empty() => {
            return Err(ContentLineError::MissingParamKey(number));
        }
        TokenizerState::ParamName => {
            return Err(ContentLineError::MissingDelimiter(number, PARAM_NAME_DELIMITER));
        }
        TokenizerState::Name | TokenizerState::ParamValue => {
            return Err(ContentLineError::MissingDelimiter(number, VALUE_DELIMITER));
        }
    }

    let value =
        unescape_text(&tok.value).map_err(|err| ContentLineError::InvalidEscape(number, err))?;
    Ok(Property::from_parsed(
        tok.name.to_ascii_uppercase(),
        Parameters::from_parsed(tok.params),
        value,
    ))
}

pub struct ContentLineParser<'a, T: Iterator<Item = Cow<'a, [u8]>>>(LineReader<'a, T>);

impl<'a> ContentLineParser<'a, BytesLines<'a>> {
    pub fn from_slice(slice: &'a [u8]) -> Self {
        ContentLineParser(LineReader::from_slice(slice))
    }
}

impl<'a, T: Iterator<Item = Cow<'a, [u8]>>> ContentLineParser<'a, T> {
    pub fn new(line_reader: LineReader<'a, T>) -> Self {
        ContentLineParser(line_reader)
    }

    #[inline]
    pub fn parse(line: &Line) -> Result<Property, ContentLineError> {
        parse_content_line(line.as_str(), line.number())
    }
}

impl<'a, T: Iterator<Item = Cow<'a, [u8]>>> Iterator for ContentLineParser<'a, T> {
    type Item = Result<Property, ContentLineError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.next()? {
            Ok(line) => Some(Self::parse(&line)),
            Err(err) => Some(Err(err.into())),
        }
    }
}
