//! The property model: a named value with an ordered list of parameters.

use crate::{
    parser::{ContentLineError, parse_content_line},
    property::{
        escape::{EscapeError, check_parameter_name, check_parameter_value, unfold_line},
        validate::PropertyValidationError,
        value_type::{ResolvedValueType, ValueType, resolve_value_type},
    },
};

pub mod escape;
pub mod validate;
pub mod value_type;

/// Property parameters, in insertion order. Keys are uppercase, each key maps
/// to one or more values.
///
/// Keys are valid names and values hold no control characters or DQUOTE, so
/// they can always be serialized.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Parameters(Vec<(String, Vec<String>)>);

impl Parameters {
    pub(crate) fn from_parsed(params: Vec<(String, Vec<String>)>) -> Self {
        Self(params)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// All values of a parameter.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|pos| self.0[pos].1.as_slice())
    }

    /// The first value of a parameter.
    #[inline]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[inline]
    pub fn get_tzid(&self) -> Option<&str> {
        self.get_param("TZID")
    }

    #[inline]
    pub fn get_value_type(&self) -> Option<&str> {
        self.get_param("VALUE")
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set the values of a parameter, keeping its position if it already
    /// exists. An empty list of values stores a single empty value.
    pub fn insert<I, S>(&mut self, name: &str, values: I) -> Result<(), EscapeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_parameter_name(name)?;
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        for value in &values {
            check_parameter_value(value)?;
        }
        if values.is_empty() {
            values.push(String::new());
        }
        self.insert_unchecked(name, values);
        Ok(())
    }

    fn insert_unchecked(&mut self, name: &str, values: Vec<String>) {
        match self.position(name) {
            Some(pos) => self.0[pos].1 = values,
            None => self.0.push((name.to_ascii_uppercase(), values)),
        }
    }

    #[inline]
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

/// An iCalendar property.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Property {
    name: String,
    params: Parameters,
    /// Unescaped property value.
    pub value: String,
}

impl Property {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            params: Parameters::default(),
            value: value.into(),
        }
    }

    pub(crate) fn from_parsed(name: String, params: Parameters, value: String) -> Self {
        Self {
            name,
            params,
            value,
        }
    }

    /// Parse a single, possibly folded, content line.
    pub fn parse(line: &str) -> Result<Self, ContentLineError> {
        let unfolded = unfold_line(line);
        parse_content_line(unfolded.trim_end_matches(['\r', '\n']), 1)
    }

    pub fn with_param<I, S>(mut self, name: &str, values: I) -> Result<Self, EscapeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.insert(name, values)?;
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_ascii_uppercase();
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    /// The explicit or inferred value type.
    pub fn value_type(&self) -> Result<ResolvedValueType, PropertyValidationError> {
        resolve_value_type(self)
    }

    pub fn set_value_type(&mut self, value_type: ValueType) {
        self.params
            .insert_unchecked("VALUE", vec![value_type.to_string()]);
    }

    pub fn validate(&self) -> Result<(), PropertyValidationError> {
        validate::validate_property(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Emitter;
    use rstest::rstest;

    #[test]
    fn names_are_uppercased() {
        let mut prop = Property::new("dtstart", "20250101")
            .with_param("value", ["DATE"])
            .unwrap();
        assert_eq!(prop.name(), "DTSTART");
        assert_eq!(prop.params().iter().next().unwrap().0, "VALUE");
        prop.set_name("x-start");
        assert_eq!(prop.name(), "X-START");
    }

    #[test]
    fn insert_keeps_position() {
        let mut params = Parameters::default();
        params.insert("A", ["1"]).unwrap();
        params.insert("B", ["2"]).unwrap();
        params.insert("a", ["3", "4"]).unwrap();
        let keys: Vec<_> = params.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["A", "B"]);
        assert_eq!(params.get("A").unwrap(), ["3", "4"]);
        assert_eq!(params.get_param("a"), Some("3"));
    }

    #[rstest]
    #[case("CN", "\"quoted\"", EscapeError::QuoteInParameter)]
    #[case("CN", "a\nb", EscapeError::ControlInParameter('\n'))]
    #[case("CN", "a\r\nb", EscapeError::ControlInParameter('\r'))]
    #[case("CN", "\x7f", EscapeError::ControlInParameter('\x7f'))]
    #[case("A B", "x", EscapeError::InvalidParameterName("A B".to_owned()))]
    #[case("", "x", EscapeError::InvalidParameterName(String::new()))]
    #[case("X:Y", "x", EscapeError::InvalidParameterName("X:Y".to_owned()))]
    fn insert_rejects_unserializable(
        #[case] name: &str,
        #[case] value: &str,
        #[case] expected: EscapeError,
    ) {
        let mut params = Parameters::default();
        assert_eq!(params.insert(name, [value]), Err(expected));
        assert!(params.is_empty());
    }

    #[test]
    fn rejected_value_keeps_old_values() {
        let mut prop = Property::new("X-P", "v").with_param("CN", ["ok"]).unwrap();
        assert!(prop.params_mut().insert("CN", ["ok", "a\nb"]).is_err());
        assert_eq!(prop.params().get_param("CN"), Some("ok"));
        assert_eq!(prop.generate(), "X-P;CN=ok:v\r\n");
    }

    #[test]
    fn remove_and_value_type() {
        let mut prop = Property::new("DTSTART", "20250101");
        prop.set_value_type(ValueType::Date);
        assert_eq!(
            prop.value_type().unwrap(),
            ResolvedValueType::Known(ValueType::Date)
        );
        prop.params_mut().remove("value");
        assert!(!prop.params().contains("VALUE"));
        assert_eq!(
            prop.value_type().unwrap(),
            ResolvedValueType::Known(ValueType::DateTime)
        );
    }

    #[test]
    fn parse_folded_line() {
        let prop = Property::parse("DESCRIPTION:Hello\\, \r\n World\r\n").unwrap();
        assert_eq!(prop.name(), "DESCRIPTION");
        assert_eq!(prop.value, "Hello, World");
    }
}
