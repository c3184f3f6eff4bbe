// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) formatter module.
//!
//! Writes a [`Component`] tree back to content lines terminated by CRLF, folding long lines.
//!
//! # Example
//!
//! ```
//! use calbridge_ical::{formatter::format, parse};
//!
//! let input = "BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR\n";
//! let calendars = parse(input).unwrap();
//! assert_eq!(
//!     format(&calendars[0]),
//!     "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n"
//! );
//! ```

use crate::keyword::{KW_BEGIN, KW_END};
use crate::syntax::{Component, Parameter, Property};

/// Format a component with default options.
#[must_use]
pub fn format(component: &Component) -> String {
    format_with(component, FormatOptions::default())
}

/// Format a component with the given options.
#[must_use]
pub fn format_with(component: &Component, options: FormatOptions) -> String {
    let mut formatter = Formatter {
        out: String::new(),
        options,
    };
    formatter.write_component(component);
    formatter.out
}

/// Formatting options for the iCalendar formatter.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)` for RFC 5545 compliance.
    pub folding: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { folding: Some(75) }
    }
}

struct Formatter {
    out: String,
    options: FormatOptions,
}

impl Formatter {
    fn write_component(&mut self, component: &Component) {
        self.write_line(&format!("{KW_BEGIN}:{}", component.name));
        for property in &component.properties {
            self.write_property(property);
        }
        for child in &component.children {
            self.write_component(child);
        }
        self.write_line(&format!("{KW_END}:{}", component.name));
    }

    fn write_property(&mut self, property: &Property) {
        let mut line = property.name.clone();
        for parameter in &property.parameters {
            line.push(';');
            write_parameter(&mut line, parameter);
        }
        line.push(':');
        line.push_str(&property.value);
        self.write_line(&line);
    }

    /// Write a content line, folding on UTF-8 character boundaries.
    fn write_line(&mut self, line: &str) {
        match self.options.folding {
            Some(limit) if limit > 1 => {
                let mut width = 0;
                for ch in line.chars() {
                    let len = ch.len_utf8();
                    if width + len > limit {
                        self.out.push_str("\r\n ");
                        width = 1;
                    }
                    self.out.push(ch);
                    width += len;
                }
            }
            _ => self.out.push_str(line),
        }
        self.out.push_str("\r\n");
    }
}

fn write_parameter(line: &mut String, parameter: &Parameter) {
    line.push_str(&parameter.name);
    line.push('=');
    for (i, value) in parameter.values.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        // DQUOTE cannot appear inside a parameter value, even quoted
        let value = value.replace('"', "");
        if value.contains([':', ';', ',']) {
            line.push('"');
            line.push_str(&value);
            line.push('"');
        } else {
            line.push_str(&value);
        }
    }
}
