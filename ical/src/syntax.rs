// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Reader for iCalendar content lines as defined in RFC 5545 section 3.1, no type.
//!
//! ```text
//! Source Text → Lexer → Token Stream → Scanner → Content Lines → Component Tree
//! ```
//!
//! Property values are kept as raw text; see [`crate::value`] for decoding.

mod lexer;
mod scanner;

use crate::keyword::{KW_BEGIN, KW_END};
use crate::parser::ParseError;
use crate::syntax::scanner::{line_number, scan_content_lines};

/// Parse raw iCalendar components from source text.
///
/// ## Errors
/// Returns the first syntax error encountered.
pub fn syntax_analysis(src: &str) -> Result<Vec<Component>, ParseError> {
    let mut roots = Vec::new();
    let mut stack: Vec<(Component, usize)> = Vec::new();

    for content in scan_content_lines(src)? {
        let line = line_number(src, content.start);
        let property = content.property;
        if property.name.eq_ignore_ascii_case(KW_BEGIN) {
            stack.push((Component::new(property.value), line));
        } else if property.name.eq_ignore_ascii_case(KW_END) {
            let Some((component, _)) = stack.pop() else {
                return Err(ParseError::PropertyOutsideComponent {
                    line,
                    name: property.name,
                });
            };
            if !component.name.eq_ignore_ascii_case(&property.value) {
                return Err(ParseError::MismatchedEnd {
                    line,
                    expected: component.name,
                    got: property.value,
                });
            }
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(component),
                None => roots.push(component),
            }
        } else {
            let Some((component, _)) = stack.last_mut() else {
                return Err(ParseError::PropertyOutsideComponent {
                    line,
                    name: property.name,
                });
            };
            component.properties.push(property);
        }
    }

    match stack.pop() {
        Some((component, _)) => Err(ParseError::UnclosedComponent {
            name: component.name,
        }),
        None => Ok(roots),
    }
}

/// A parsed iCalendar component (e.g., VCALENDAR, VEVENT, VTIMEZONE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, original casing preserved
    pub name: String,
    /// Properties in original order
    pub properties: Vec<Property>,
    /// Nested child components
    pub children: Vec<Component>,
}

impl Component {
    /// Create an empty component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Whether this component has the given name, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First property with the given name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.is(name))
    }

    /// All properties with the given name, in original order.
    pub fn properties_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> {
        self.properties.iter().filter(move |p| p.is(name))
    }

    /// Direct children with the given component name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Component> {
        self.children.iter().filter(move |c| c.is(name))
    }

    /// Replace every property named like `property` with the single given one.
    ///
    /// The replacement takes the position of the first removed property, or is appended.
    pub fn set_property(&mut self, property: Property) {
        let position = self.properties.iter().position(|p| p.is(&property.name));
        self.remove_properties(&property.name);
        let index = position.unwrap_or(self.properties.len());
        self.properties.insert(index, property);
    }

    /// Remove every property with the given name.
    pub fn remove_properties(&mut self, name: &str) {
        self.properties.retain(|p| !p.is(name));
    }
}

/// A parsed iCalendar property (name, optional parameters, and value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name, original casing preserved
    pub name: String,
    /// Property parameters, duplicates and multi-values allowed
    pub parameters: Vec<Parameter>,
    /// Raw property value
    pub value: String,
}

impl Property {
    /// Create a property without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            value: value.into(),
        }
    }

    /// Whether this property has the given name, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First parameter with the given name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// First value of the first parameter with the given name.
    #[must_use]
    pub fn parameter_value(&self, name: &str) -> Option<&str> {
        self.parameter(name)
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }
}

/// A parsed iCalendar parameter (e.g., `TZID=America/New_York`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, original casing preserved
    pub name: String,
    /// Parameter values split by commas, quotes removed
    pub values: Vec<String>,
}

impl Parameter {
    /// Create a single-valued parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }
}
