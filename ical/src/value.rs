// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Decoding of the property value types calbridge needs, as defined in RFC 5545 Section 3.3.

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};

use crate::keyword::{KW_DATE, KW_TZID, KW_VALUE};
use crate::syntax::Property;

/// Errors raised while decoding a property value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {property} value '{value}': {reason}")]
pub struct ValueError {
    /// Property name.
    pub property: String,
    /// Raw value that failed to decode.
    pub value: String,
    /// Why decoding failed.
    pub reason: String,
}

impl ValueError {
    fn new(property: &Property, reason: impl ToString) -> Self {
        Self {
            property: property.name.clone(),
            value: property.value.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Decode a TEXT value (Section 3.3.11), resolving backslash escapes.
///
/// ```
/// # use calbridge_ical::value::unescape_text;
/// assert_eq!(unescape_text(r"Room 1\, floor 2\nBring \\laptop"), "Room 1, floor 2\nBring \\laptop");
/// ```
#[must_use]
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ (',' | ';' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Resolve a DATE or DATE-TIME property to an instant.
///
/// - `VALUE=DATE` or an 8-character value is midnight UTC of that day.
/// - A trailing `Z` is UTC.
/// - A `TZID` parameter naming a known zone is local time in that zone.
/// - Floating times and unknown zones are read as UTC.
///
/// ## Errors
///
/// Returns an error if the value is not a valid date or date-time.
pub fn parse_date_time(property: &Property) -> Result<Timestamp, ValueError> {
    let value = property.value.trim();
    let is_date = property
        .parameter_value(KW_VALUE)
        .is_some_and(|v| v.eq_ignore_ascii_case(KW_DATE))
        || value.len() == 8;

    let zoned = if is_date {
        Date::strptime("%Y%m%d", value).and_then(|d| d.to_zoned(TimeZone::UTC))
    } else if let Some(utc) = value.strip_suffix(['Z', 'z']) {
        DateTime::strptime("%Y%m%dT%H%M%S", utc).and_then(|dt| dt.to_zoned(TimeZone::UTC))
    } else {
        let tz = property
            .parameter_value(KW_TZID)
            .and_then(|tzid| TimeZone::get(tzid.trim_start_matches('/')).ok())
            .unwrap_or(TimeZone::UTC);
        DateTime::strptime("%Y%m%dT%H%M%S", value).and_then(|dt| dt.to_zoned(tz))
    };

    zoned
        .map(|z| z.timestamp())
        .map_err(|e| ValueError::new(property, e))
}

/// Decode a DURATION value (Section 3.3.6) and add it to `start`.
///
/// ## Errors
///
/// Returns an error if the value is not a valid duration.
pub fn add_duration(start: Timestamp, property: &Property) -> Result<Timestamp, ValueError> {
    let span: Span = property
        .value
        .trim()
        .parse()
        .map_err(|e| ValueError::new(property, e))?;
    start
        .to_zoned(TimeZone::UTC)
        .checked_add(span)
        .map(|z| z.timestamp())
        .map_err(|e| ValueError::new(property, e))
}
