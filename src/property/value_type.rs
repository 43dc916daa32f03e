//! Property value types (RFC 5545 §3.3) and the value types each known
//! property supports.

use derive_more::{Display, From};
use phf::phf_map;

use crate::{grammar, property::Property, property::validate::PropertyValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ValueType {
    #[display("BINARY")]
    Binary,
    #[display("BOOLEAN")]
    Boolean,
    #[display("CAL-ADDRESS")]
    CalAddress,
    #[display("DATE")]
    Date,
    #[display("DATE-TIME")]
    DateTime,
    #[display("DURATION")]
    Duration,
    #[display("FLOAT")]
    Float,
    #[display("INTEGER")]
    Integer,
    #[display("PERIOD")]
    Period,
    #[display("RECUR")]
    Recur,
    #[display("TEXT")]
    Text,
    #[display("TIME")]
    Time,
    #[display("URI")]
    Uri,
    #[display("UTC-OFFSET")]
    UtcOffset,
}

impl ValueType {
    pub const ALL: [ValueType; 14] = [
        Self::Binary,
        Self::Boolean,
        Self::CalAddress,
        Self::Date,
        Self::DateTime,
        Self::Duration,
        Self::Float,
        Self::Integer,
        Self::Period,
        Self::Recur,
        Self::Text,
        Self::Time,
        Self::Uri,
        Self::UtcOffset,
    ];

    /// Case-insensitive lookup of a known value type.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value_type| value_type.to_string().eq_ignore_ascii_case(name))
    }
}

/// The value type of a property: one of the RFC types or an extension
/// (`x-name` / `iana-token`) type this crate knows nothing about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From)]
pub enum ResolvedValueType {
    Known(ValueType),
    #[from(ignore)]
    Extension(String),
}

impl ResolvedValueType {
    pub fn known(&self) -> Option<ValueType> {
        match self {
            Self::Known(value_type) => Some(*value_type),
            Self::Extension(_) => None,
        }
    }
}

/// Value types supported by each known property, the first one is the default.
static SUPPORTED_VALUE_TYPES: phf::Map<&'static str, &'static [ValueType]> = phf_map! {
    "CALSCALE" => &[ValueType::Text],
    "METHOD" => &[ValueType::Text],
    "PRODID" => &[ValueType::Text],
    "VERSION" => &[ValueType::Text],
    "ATTACH" => &[ValueType::Uri, ValueType::Binary],
    "CATEGORIES" => &[ValueType::Text],
    "CLASS" => &[ValueType::Text],
    "COMMENT" => &[ValueType::Text],
    "DESCRIPTION" => &[ValueType::Text],
    "GEO" => &[ValueType::Float],
    "LOCATION" => &[ValueType::Text],
    "PERCENT-COMPLETE" => &[ValueType::Integer],
    "PRIORITY" => &[ValueType::Integer],
    "RESOURCES" => &[ValueType::Text],
    "STATUS" => &[ValueType::Text],
    "SUMMARY" => &[ValueType::Text],
    "COMPLETED" => &[ValueType::DateTime],
    "DTEND" => &[ValueType::DateTime, ValueType::Date],
    "DUE" => &[ValueType::DateTime, ValueType::Date],
    "DTSTART" => &[ValueType::DateTime, ValueType::Date],
    "DURATION" => &[ValueType::Duration],
    "FREEBUSY" => &[ValueType::Period],
    "TRANSP" => &[ValueType::Text],
    "TZID" => &[ValueType::Text],
    "TZNAME" => &[ValueType::Text],
    "TZOFFSETFROM" => &[ValueType::UtcOffset],
    "TZOFFSETTO" => &[ValueType::UtcOffset],
    "TZURL" => &[ValueType::Uri],
    "ATTENDEE" => &[ValueType::CalAddress],
    "CONTACT" => &[ValueType::Text],
    "ORGANIZER" => &[ValueType::CalAddress],
    "RECURRENCE-ID" => &[ValueType::DateTime, ValueType::Date],
    "RELATED-TO" => &[ValueType::Text],
    "URL" => &[ValueType::Uri],
    "UID" => &[ValueType::Text],
    "EXDATE" => &[ValueType::DateTime, ValueType::Date],
    "RDATE" => &[ValueType::DateTime, ValueType::Date, ValueType::Period],
    "RRULE" => &[ValueType::Recur],
    "ACTION" => &[ValueType::Text],
    "REPEAT" => &[ValueType::Integer],
    "TRIGGER" => &[ValueType::Duration, ValueType::DateTime],
    "CREATED" => &[ValueType::DateTime],
    "DTSTAMP" => &[ValueType::DateTime],
    "LAST-MODIFIED" => &[ValueType::DateTime],
    "SEQUENCE" => &[ValueType::Integer],
    "REQUEST-STATUS" => &[ValueType::Text],
};

/// Supported value types of a known property, `None` for unknown properties.
pub fn supported_value_types(name: &str) -> Option<&'static [ValueType]> {
    SUPPORTED_VALUE_TYPES
        .get(name.to_ascii_uppercase().as_str())
        .copied()
}

#[inline]
pub fn is_known_property_name(name: &str) -> bool {
    supported_value_types(name).is_some()
}

/// Default value type of a property, `TEXT` if the property is unknown.
pub fn default_value_type(name: &str) -> ValueType {
    supported_value_types(name)
        .and_then(|types| types.first().copied())
        .unwrap_or(ValueType::Text)
}

/// The value type set by the `VALUE` parameter, if any.
///
/// Known types are normalised to uppercase, extension types are returned as
/// written. An empty `VALUE` parameter counts as absent.
pub fn explicit_value_type(
    property: &Property,
) -> Result<Option<ResolvedValueType>, PropertyValidationError> {
    let Some(value) = property.params().get_value_type() else {
        return Ok(None);
    };
    if value.is_empty() {
        return Ok(None);
    }
    if !grammar::is_param_value(value) {
        return Err(PropertyValidationError::InvalidValueParameter(
            value.to_owned(),
        ));
    }
    Ok(Some(match ValueType::from_name(value) {
        Some(known) => ResolvedValueType::Known(known),
        None => ResolvedValueType::Extension(value.to_owned()),
    }))
}

/// The explicit value type of a property, or the default of its name.
pub fn resolve_value_type(property: &Property) -> Result<ResolvedValueType, PropertyValidationError> {
    Ok(explicit_value_type(property)?
        .unwrap_or_else(|| default_value_type(property.name()).into()))
}
