use std::borrow::Cow;

use crate::{
    LineReader, ParserError,
    component::Component,
    parser::{BytesLines, Line, ParserOptions, parse_content_line},
    property::Property,
};

/// Build a component tree from content lines.
///
/// The input must hold exactly one top-level component. Nested components
/// are kept on a stack until their `END` line is reached.
pub struct ComponentParser<'a, I: Iterator<Item = Cow<'a, [u8]>>> {
    line_reader: LineReader<'a, I>,
    options: ParserOptions,
}

impl<'a> ComponentParser<'a, BytesLines<'a>> {
    /// Return a new `ComponentParser` reading from a byte slice.
    pub fn from_slice(slice: &'a [u8]) -> Self {
        Self::new(LineReader::from_slice(slice))
    }
}

impl<'a, I: Iterator<Item = Cow<'a, [u8]>>> ComponentParser<'a, I> {
    pub fn new(line_reader: LineReader<'a, I>) -> Self {
        ComponentParser {
            line_reader,
            options: Default::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.line_reader = self.line_reader.strict(options.strict_line_endings);
        self.options = options;
        self
    }

    /// The component name of a `BEGIN` or `END` line.
    fn delimiter_name(line: &Line, prop: &Property) -> Result<String, ParserError> {
        if !prop.params().is_empty() {
            return Err(ParserError::DelimiterParameters(line.number()));
        }
        if prop.value.is_empty() {
            return Err(ParserError::MissingComponentName(line.number()));
        }
        Ok(prop.value.clone())
    }

    #[tracing::instrument(skip(self), fields(validate = self.options.validate))]
    pub fn parse(mut self) -> Result<Component, ParserError> {
        let mut stack: Vec<Component> = vec![];
        let mut root: Option<Component> = None;

        for line in &mut self.line_reader {
            let line = line?;
            if root.is_some() {
                return Err(ParserError::TrailingData(line.number()));
            }
            let prop = parse_content_line(line.as_str(), line.number())?;
            tracing::trace!(line = line.number(), name = prop.name(), depth = stack.len());

            match prop.name() {
                "BEGIN" => {
                    let name = Self::delimiter_name(&line, &prop)?;
                    stack.push(Component::new(&name));
                }
                "END" => {
                    let name = Self::delimiter_name(&line, &prop)?;
                    let Some(component) = stack.pop() else {
                        return Err(ParserError::UnmatchedEnd {
                            line: line.number(),
                            name,
                        });
                    };
                    if component.name() != name {
                        return Err(ParserError::MalformedNesting {
                            line: line.number(),
                            expected: component.name().to_owned(),
                            found: name,
                        });
                    }
                    tracing::debug!(
                        component = component.name(),
                        properties = component.properties.len(),
                        children = component.components.len(),
                        "Parsed component"
                    );
                    match stack.last_mut() {
                        Some(parent) => parent.add_component(component),
                        None => root = Some(component),
                    }
                }
                _ => {
                    let Some(current) = stack.last_mut() else {
                        return Err(ParserError::PropertyOutsideComponent(line.number()));
                    };
                    current.add_property(prop);
                }
            }
        }

        let root = root.ok_or(ParserError::NotComplete)?;
        if self.options.validate {
            root.validate()?;
        }
        Ok(root)
    }
}
