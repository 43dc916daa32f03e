use itertools::Itertools;

use crate::{
    grammar,
    property::{
        Property,
        value_type::{ResolvedValueType, ValueType, resolve_value_type, supported_value_types},
    },
    types::{
        date::{parse_date_string, parse_date_time_string},
        geo::{Geo, InvalidGeo},
    },
};

/// Properties whose value is a comma separated list of the value type.
const LIST_VALUED: [&str; 3] = ["EXDATE", "RDATE", "FREEBUSY"];

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PropertyValidationError {
    #[error("{value} does not match pattern for {value_type}")]
    InvalidValue { value: String, value_type: ValueType },
    #[error("Property {name} has unsupported value type {value_type}, must be {allowed}")]
    UnsupportedValueType {
        name: String,
        value_type: ResolvedValueType,
        allowed: String,
    },
    #[error("Unknown property {name} has an invalid value: {source}")]
    UnknownProperty {
        name: String,
        #[source]
        source: Box<PropertyValidationError>,
    },
    #[error("Invalid VALUE parameter {0:?}")]
    InvalidValueParameter(String),
    #[error(transparent)]
    Geo(#[from] InvalidGeo),
}

fn describe_allowed(types: &[ValueType]) -> String {
    match types {
        [single] => single.to_string(),
        _ => format!("one of {}", types.iter().join(", ")),
    }
}

/// Check a raw value against the grammar of its value type.
///
/// `RECUR` is accepted without checks and extension types pass with a warning.
pub fn validate_value(
    value: &str,
    value_type: &ResolvedValueType,
) -> Result<(), PropertyValidationError> {
    let value_type = match value_type {
        ResolvedValueType::Known(value_type) => *value_type,
        ResolvedValueType::Extension(name) => {
            tracing::warn!(value_type = %name, "Cannot validate value of extension type");
            return Ok(());
        }
    };
    let valid = match value_type {
        ValueType::Binary => grammar::BINARY.is_match(value),
        ValueType::Boolean => grammar::BOOLEAN.is_match(value),
        ValueType::CalAddress | ValueType::Uri => grammar::URI.is_match(value),
        ValueType::Date => parse_date_string(value).is_ok(),
        ValueType::DateTime => parse_date_time_string(value).is_ok(),
        ValueType::Duration => grammar::DURATION.is_match(value),
        ValueType::Float => grammar::FLOAT.is_match(value),
        ValueType::Integer => grammar::INTEGER.is_match(value),
        ValueType::Period => grammar::is_period(value),
        ValueType::Recur => true,
        ValueType::Text => grammar::TEXT.is_match(value),
        ValueType::Time => grammar::TIME.is_match(value),
        ValueType::UtcOffset => grammar::UTC_OFFSET.is_match(value),
    };
    if valid {
        Ok(())
    } else {
        Err(PropertyValidationError::InvalidValue {
            value: value.to_owned(),
            value_type,
        })
    }
}

fn validate_known_value(
    property: &Property,
    value_type: &ResolvedValueType,
) -> Result<(), PropertyValidationError> {
    if property.name() == "GEO" {
        property.value.parse::<Geo>()?;
        return Ok(());
    }
    let is_text = value_type.known() == Some(ValueType::Text);
    if LIST_VALUED.contains(&property.name()) && !is_text {
        return property
            .value
            .split(',')
            .try_for_each(|item| validate_value(item, value_type));
    }
    validate_value(&property.value, value_type)
}

/// Validate a property against the value types its name supports.
///
/// Unknown properties only have their value checked against the resolved
/// type, which is `TEXT` unless a `VALUE` parameter says otherwise.
pub fn validate_property(property: &Property) -> Result<(), PropertyValidationError> {
    let value_type = resolve_value_type(property)?;
    let Some(supported) = supported_value_types(property.name()) else {
        return validate_value(&property.value, &value_type).map_err(|err| {
            PropertyValidationError::UnknownProperty {
                name: property.name().to_owned(),
                source: Box::new(err),
            }
        });
    };

    match value_type.known() {
        Some(known) if supported.contains(&known) => {}
        _ => {
            return Err(PropertyValidationError::UnsupportedValueType {
                name: property.name().to_owned(),
                value_type,
                allowed: describe_allowed(supported),
            });
        }
    }
    validate_known_value(property, &value_type)
}
