// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar objects carrying events, as exchanged with CalDAV servers and mailed as invitations.

use jiff::Timestamp;

use crate::formatter::format;
use crate::keyword::{
    KW_ATTENDEE, KW_DESCRIPTION, KW_DTEND, KW_DTSTART, KW_DURATION, KW_METHOD, KW_METHOD_CANCEL,
    KW_ORGANIZER, KW_PARTSTAT, KW_PARTSTAT_NEEDS_ACTION, KW_SUMMARY, KW_UID, KW_VCALENDAR,
    KW_VEVENT, MAILTO_PREFIX,
};
use crate::parser::{ParseError, parse};
use crate::syntax::{Component, Property};
use crate::value::{ValueError, add_duration, parse_date_time, unescape_text};

/// One `VCALENDAR` object together with the events it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    calendar: Component,
}

/// A calendar user referenced by `ATTENDEE` or `ORGANIZER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Address with the `mailto:` scheme removed.
    pub email: String,
    /// `PARTSTAT` parameter, if present.
    pub status: Option<String>,
}

/// Errors raised while reading event details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// A property required to answer the query is absent.
    #[error("event has no {0} property")]
    MissingProperty(&'static str),

    /// A property value could not be decoded.
    #[error(transparent)]
    InvalidValue(#[from] ValueError),
}

impl CalendarEvent {
    /// Parse every `VCALENDAR` object in `src`.
    ///
    /// ## Errors
    ///
    /// Returns an error on malformed content or a top-level component that is not `VCALENDAR`.
    pub fn parse(src: &str) -> Result<Vec<Self>, ParseError> {
        parse(src)?.into_iter().map(Self::try_from).collect()
    }

    /// The underlying `VCALENDAR` component.
    #[must_use]
    pub fn calendar(&self) -> &Component {
        &self.calendar
    }

    /// The `VEVENT` components.
    pub fn events(&self) -> impl Iterator<Item = &Component> {
        self.calendar.children_named(KW_VEVENT)
    }

    /// `UID` values of every event, in order.
    #[must_use]
    pub fn uids(&self) -> Vec<&str> {
        self.events()
            .flat_map(|e| e.properties_named(KW_UID))
            .map(|p| p.value.as_str())
            .collect()
    }

    /// Attendees of every event.
    #[must_use]
    pub fn attendees(&self) -> Vec<Participant> {
        self.participants(KW_ATTENDEE)
    }

    /// Organizers of every event.
    #[must_use]
    pub fn organizers(&self) -> Vec<Participant> {
        self.participants(KW_ORGANIZER)
    }

    /// Concatenated `SUMMARY` of every event, unescaped.
    #[must_use]
    pub fn summary(&self) -> String {
        self.text(KW_SUMMARY)
    }

    /// Concatenated `DESCRIPTION` of every event, unescaped.
    #[must_use]
    pub fn description(&self) -> String {
        self.text(KW_DESCRIPTION)
    }

    /// Earliest `DTSTART` across events.
    ///
    /// ## Errors
    ///
    /// Returns an error if there is no event, an event lacks `DTSTART`, or a value is invalid.
    pub fn start(&self) -> Result<Timestamp, EventError> {
        let mut earliest: Option<Timestamp> = None;
        for event in self.events() {
            let start = event_start(event)?;
            earliest = Some(earliest.map_or(start, |e| e.min(start)));
        }
        earliest.ok_or(EventError::MissingProperty(KW_DTSTART))
    }

    /// Latest end across events, from `DTEND` or `DTSTART` plus `DURATION`.
    ///
    /// ## Errors
    ///
    /// Returns an error if there is no event, an event has neither `DTEND` nor `DURATION`,
    /// or a value is invalid.
    pub fn end(&self) -> Result<Timestamp, EventError> {
        let mut latest: Option<Timestamp> = None;
        for event in self.events() {
            let end = if let Some(dtend) = event.property(KW_DTEND) {
                parse_date_time(dtend)?
            } else if let Some(duration) = event.property(KW_DURATION) {
                add_duration(event_start(event)?, duration)?
            } else {
                return Err(EventError::MissingProperty(KW_DTEND));
            };
            latest = Some(latest.map_or(end, |l| l.max(end)));
        }
        latest.ok_or(EventError::MissingProperty(KW_DTEND))
    }

    /// The calendar-level `METHOD`, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.calendar.property(KW_METHOD).map(|p| p.value.trim())
    }

    /// Whether this object is an iTIP cancellation.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        self.method()
            .is_some_and(|m| m.eq_ignore_ascii_case(KW_METHOD_CANCEL))
    }

    /// A copy with `METHOD` set to `method`.
    #[must_use]
    pub fn with_method(&self, method: &str) -> Self {
        let mut calendar = self.calendar.clone();
        calendar.set_property(Property::new(KW_METHOD, method));
        Self { calendar }
    }

    /// A copy with `METHOD` removed, suitable for storing on a CalDAV server.
    #[must_use]
    pub fn without_method(&self) -> Self {
        let mut calendar = self.calendar.clone();
        calendar.remove_properties(KW_METHOD);
        Self { calendar }
    }

    /// Serialize back to iCalendar text.
    #[must_use]
    pub fn to_ics(&self) -> String {
        format(&self.calendar)
    }

    fn participants(&self, name: &str) -> Vec<Participant> {
        self.events()
            .flat_map(|e| e.properties_named(name))
            .filter_map(|p| {
                let email = strip_mailto(p.value.trim())?;
                Some(Participant {
                    email: email.to_string(),
                    status: p.parameter_value(KW_PARTSTAT).map(str::to_string),
                })
            })
            .collect()
    }

    fn text(&self, name: &str) -> String {
        self.events()
            .flat_map(|e| e.properties_named(name))
            .map(|p| unescape_text(&p.value))
            .collect()
    }
}

impl TryFrom<Component> for CalendarEvent {
    type Error = ParseError;

    fn try_from(calendar: Component) -> Result<Self, Self::Error> {
        if calendar.is(KW_VCALENDAR) {
            Ok(Self { calendar })
        } else {
            Err(ParseError::NotACalendar {
                name: calendar.name,
            })
        }
    }
}

impl Participant {
    /// Whether the participant has not answered yet; a missing `PARTSTAT` counts as unanswered.
    #[must_use]
    pub fn needs_action(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case(KW_PARTSTAT_NEEDS_ACTION))
    }
}

fn event_start(event: &Component) -> Result<Timestamp, EventError> {
    let dtstart = event
        .property(KW_DTSTART)
        .ok_or(EventError::MissingProperty(KW_DTSTART))?;
    Ok(parse_date_time(dtstart)?)
}

fn strip_mailto(value: &str) -> Option<&str> {
    let prefix = value.get(..MAILTO_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(MAILTO_PREFIX) {
        value.get(MAILTO_PREFIX.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_mailto_case_insensitively() {
        assert_eq!(strip_mailto("mailto:a@x"), Some("a@x"));
        assert_eq!(strip_mailto("MAILTO:a@x"), Some("a@x"));
        assert_eq!(strip_mailto("urn:uuid:1"), None);
        assert_eq!(strip_mailto("mail"), None);
    }

    #[test]
    fn missing_partstat_needs_action() {
        let p = Participant {
            email: "a@x".to_string(),
            status: None,
        };
        assert!(p.needs_action());
        let p = Participant {
            email: "a@x".to_string(),
            status: Some("needs-action".to_string()),
        };
        assert!(p.needs_action());
        let p = Participant {
            email: "a@x".to_string(),
            status: Some("ACCEPTED".to_string()),
        };
        assert!(!p.needs_action());
    }
}
