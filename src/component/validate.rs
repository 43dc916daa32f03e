use crate::{
    component::{Component, ComponentKind},
    property::validate::{PropertyValidationError, validate_property},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{component}: missing required property {property}")]
    MissingProperty { component: String, property: String },
    #[error("Expected component {expected}, found {found}")]
    ComponentValidation {
        expected: ComponentKind,
        found: String,
    },
    #[error("{component}: {source}")]
    Property {
        component: String,
        #[source]
        source: PropertyValidationError,
    },
}

impl ComponentKind {
    /// Properties every component of this kind must carry.
    pub fn required_properties(self) -> &'static [&'static str] {
        match self {
            Self::Calendar => &["PRODID", "VERSION"],
            Self::Event | Self::Todo | Self::Journal | Self::FreeBusy => &["UID", "DTSTAMP"],
            Self::Timezone => &["TZID"],
            Self::Standard | Self::Daylight => &["DTSTART", "TZOFFSETFROM", "TZOFFSETTO"],
            Self::Alarm => &["ACTION", "TRIGGER"],
            Self::Other => &[],
        }
    }
}

impl Component {
    fn property_error(&self, source: PropertyValidationError) -> ValidationError {
        ValidationError::Property {
            component: self.name().to_owned(),
            source,
        }
    }

    /// Validate every instance of an optional property, if present.
    pub fn validate_optional_property(&self, name: &str) -> Result<(), ValidationError> {
        self.get_named_properties(name)
            .try_for_each(|prop| validate_property(prop).map_err(|err| self.property_error(err)))
    }

    /// Require a property to be present and validate every instance of it.
    pub fn validate_required_property(&self, name: &str) -> Result<(), ValidationError> {
        if !self.has_property(name) {
            return Err(ValidationError::MissingProperty {
                component: self.name().to_owned(),
                property: name.to_ascii_uppercase(),
            });
        }
        self.validate_optional_property(name)
    }

    /// Validate all properties, requiring those named in `required`.
    pub fn validate_all_properties(&self, required: &[&str]) -> Result<(), ValidationError> {
        for name in required {
            self.validate_required_property(name)?;
        }
        self.properties
            .iter()
            .filter(|prop| !required.iter().any(|name| prop.name().eq_ignore_ascii_case(name)))
            .try_for_each(|prop| validate_property(prop).map_err(|err| self.property_error(err)))
    }

    /// Validate this component and its children against the rules of their
    /// kinds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_all_properties(self.kind().required_properties())?;
        self.components.iter().try_for_each(Component::validate)
    }

    pub fn expect_kind(&self, kind: ComponentKind) -> Result<(), ValidationError> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(ValidationError::ComponentValidation {
                expected: kind,
                found: self.name().to_owned(),
            })
        }
    }
}
