//! Serialize properties and components back to iCalendar text.
//!
//! Values are escaped so that parsing gives them back unchanged. Parameter
//! values are quoted where needed and every content line is folded and
//! terminated with CRLF.

use itertools::Itertools;

use crate::{
    component::Component,
    property::{
        Property,
        escape::{escape_text, escape_value, fold_line, quote_parameter_value},
        value_type::ValueType,
    },
};

pub trait Emitter {
    fn generate(&self) -> String;
}

impl Emitter for Property {
    fn generate(&self) -> String {
        let mut line = self.name().to_owned();
        for (key, values) in self.params().iter() {
            line.push(crate::PARAM_DELIMITER);
            line.push_str(key);
            line.push(crate::PARAM_NAME_DELIMITER);
            line.push_str(
                &values
                    .iter()
                    .map(|value| quote_parameter_value(value))
                    .join(&crate::PARAM_VALUE_DELIMITER.to_string()),
            );
        }
        line.push(crate::VALUE_DELIMITER);
        // an unusable VALUE parameter still gets the safe TEXT treatment
        let is_text = self
            .value_type()
            .map_or(true, |value_type| value_type.known() == Some(ValueType::Text));
        if is_text {
            line.push_str(&escape_text(&self.value));
        } else {
            line.push_str(&escape_value(&self.value));
        }
        fold_line(&line) + "\r\n"
    }
}

impl Emitter for [Property] {
    fn generate(&self) -> String {
        self.iter().map(Emitter::generate).collect()
    }
}

impl Emitter for Vec<Property> {
    fn generate(&self) -> String {
        self.as_slice().generate()
    }
}

impl Emitter for Component {
    fn generate(&self) -> String {
        let name = self.name();
        let mut text = format!("BEGIN:{name}\r\n");
        text += &self.properties.generate();
        for child in &self.components {
            text += &child.generate();
        }
        text + "END:" + name + "\r\n"
    }
}
