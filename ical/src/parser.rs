// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::syntax::{Component, syntax_analysis};

/// Parse iCalendar components from source text.
///
/// ## Errors
///
/// Returns the first syntax error found, with the 1-based line it starts on.
///
/// ## Examples
///
/// ```
/// # use calbridge_ical::parse;
/// let ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// SUMMARY:Test Event\r\n\
/// END:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// let components = parse(ical_src).unwrap();
/// assert_eq!(components.len(), 1);
/// assert_eq!(components[0].children.len(), 1);
/// ```
///
/// ```
/// # use calbridge_ical::{ParseError, parse};
/// let invalid_ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// END:VEVENT\r\n\
/// ";
/// assert!(matches!(
///     parse(invalid_ical_src),
///     Err(ParseError::MismatchedEnd { line: 3, .. })
/// ));
/// ```
pub fn parse(src: &str) -> Result<Vec<Component>, ParseError> {
    syntax_analysis(src)
}

/// Errors raised while reading iCalendar text.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A folded continuation line appeared before any content line.
    #[error("line {line}: continuation line without a preceding content line")]
    OrphanContinuation {
        /// Line number.
        line: usize,
    },

    /// The content line has no `:` separating the value.
    #[error("line {line}: missing ':' before the property value")]
    MissingValue {
        /// Line number.
        line: usize,
    },

    /// A property or parameter name contains characters outside `A-Z a-z 0-9 -`.
    #[error("line {line}: invalid name '{name}'")]
    InvalidName {
        /// Line number.
        line: usize,
        /// The offending name.
        name: String,
    },

    /// A quoted parameter value is not closed.
    #[error("line {line}: unterminated quoted parameter value")]
    UnterminatedQuote {
        /// Line number.
        line: usize,
    },

    /// A property was found outside of `BEGIN`/`END`.
    #[error("line {line}: property '{name}' outside of any component")]
    PropertyOutsideComponent {
        /// Line number.
        line: usize,
        /// Property name.
        name: String,
    },

    /// `END` does not match the innermost open `BEGIN`.
    #[error("line {line}: expected END:{expected}, got END:{got}")]
    MismatchedEnd {
        /// Line number.
        line: usize,
        /// Name of the open component.
        expected: String,
        /// Name found in the `END` line.
        got: String,
    },

    /// Input ended with components still open.
    #[error("component '{name}' is not closed")]
    UnclosedComponent {
        /// Name of the open component.
        name: String,
    },

    /// A top-level component other than `VCALENDAR` was given where a calendar object is required.
    #[error("expected a VCALENDAR component, got '{name}'")]
    NotACalendar {
        /// Name of the component found.
        name: String,
    },
}
