//! Calendar components: a name, ordered properties and ordered child
//! components.

use std::fmt;

use crate::property::Property;

mod validate;
pub use validate::ValidationError;

/// The component kinds this crate knows, derived from the component name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Calendar,
    Event,
    Todo,
    Journal,
    FreeBusy,
    Timezone,
    Standard,
    Daylight,
    Alarm,
    /// `x-name` / `iana-token` components.
    Other,
}

impl ComponentKind {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            "VALARM" => Self::Alarm,
            _ => Self::Other,
        }
    }

    /// The canonical component name, `None` for [`ComponentKind::Other`].
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::Calendar => Some("VCALENDAR"),
            Self::Event => Some("VEVENT"),
            Self::Todo => Some("VTODO"),
            Self::Journal => Some("VJOURNAL"),
            Self::FreeBusy => Some("VFREEBUSY"),
            Self::Timezone => Some("VTIMEZONE"),
            Self::Standard => Some("STANDARD"),
            Self::Daylight => Some("DAYLIGHT"),
            Self::Alarm => Some("VALARM"),
            Self::Other => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("x-component"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    pub properties: Vec<Property>,
    pub components: Vec<Component>,
}

impl Component {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: ComponentKind::from_name(name),
            properties: vec![],
            components: vec![],
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// First property with the given name.
    pub fn get_property<'c>(&'c self, name: &str) -> Option<&'c Property> {
        self.properties
            .iter()
            .find(|prop| prop.name().eq_ignore_ascii_case(name))
    }

    pub fn get_property_mut<'c>(&'c mut self, name: &str) -> Option<&'c mut Property> {
        self.properties
            .iter_mut()
            .find(|prop| prop.name().eq_ignore_ascii_case(name))
    }

    pub fn get_named_properties<'c>(&'c self, name: &'c str) -> impl Iterator<Item = &'c Property> {
        self.properties
            .iter()
            .filter(move |prop| prop.name().eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    #[inline]
    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Replace the first property of the same name, or append it.
    pub fn set_property(&mut self, property: Property) {
        match self.get_property_mut(property.name()) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    /// Remove every property with the given name.
    pub fn remove_property(&mut self, name: &str) {
        self.properties
            .retain(|prop| !prop.name().eq_ignore_ascii_case(name));
    }

    #[inline]
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Remove the first child equal to `component`. Returns whether one was
    /// removed.
    pub fn remove_component(&mut self, component: &Component) -> bool {
        match self.components.iter().position(|child| child == component) {
            Some(pos) => {
                self.components.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn get_components(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |child| child.kind == kind)
    }
}
