//! iCalendar (RFC 5545) codec.
//!
//! Parse text into a tree of [`Component`]s holding [`Property`]s and
//! serialize it back with [`generator::Emitter`].
//!
//! ```rust
//! let input = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nSUMMARY:Lunch\\, again\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
//!
//! let calendar = ical_codec::parse(input).unwrap();
//! assert_eq!(calendar.components[0].get_property("SUMMARY").unwrap().value, "Lunch, again");
//! assert_eq!(ical_codec::serialize(&calendar), input);
//! ```

const PARAM_VALUE_DELIMITER: char = ',';
const VALUE_DELIMITER: char = ':';
const PARAM_DELIMITER: char = ';';
const PARAM_NAME_DELIMITER: char = '=';
const PARAM_QUOTE: char = '"';

pub mod component;
pub use component::{Component, ComponentKind, ValidationError};

pub mod grammar;

pub mod parser;
pub use parser::{
    ComponentParser, ContentLineError, ContentLineParser, DeserializationError, LineReader,
    ParserError, ParserOptions,
};

pub mod property;
pub use property::Property;

pub mod generator;
use generator::Emitter;

pub mod types;

/// Parse a document holding exactly one top-level component.
pub fn parse(text: &str) -> Result<Component, ParserError> {
    parse_with_options(text, ParserOptions::default())
}

pub fn parse_with_options(text: &str, options: ParserOptions) -> Result<Component, ParserError> {
    ComponentParser::from_slice(text.as_bytes())
        .with_options(options)
        .parse()
}

/// Serialize a component tree to CRLF terminated, folded content lines.
pub fn serialize(component: &Component) -> String {
    component.generate()
}

/// Parse a single, possibly folded, content line.
pub fn deserialize_property(line: &str) -> Result<Property, ContentLineError> {
    Property::parse(line)
}
