// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request builders for `CalDAV` operations.

use std::io::Cursor;

use jiff::Timestamp;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::CalDavError;
use crate::xml::ns;

/// Calendar query request builder (RFC 4791 section 7.8).
#[derive(Debug)]
pub struct CalendarQueryRequest {
    component: String,
    time_range: Option<TimeRange>,
}

/// Time range filter for calendar queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: Timestamp,
    /// Exclusive end.
    pub end: Timestamp,
}

impl CalendarQueryRequest {
    /// Creates a query for all components of the given type (VEVENT, VTODO, ...).
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            time_range: None,
        }
    }

    /// Restricts results to components overlapping `[start, end)`.
    #[must_use]
    pub fn time_range(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.time_range = Some(TimeRange { start, end });
        self
    }

    /// Builds the XML body for the calendar query request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CalDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
        let mut calendar_query = BytesStart::new("C:calendar-query");
        calendar_query.push_attribute(("xmlns:D", ns::DAV));
        calendar_query.push_attribute(("xmlns:C", ns::CALDAV));
        writer.write_event(Event::Start(calendar_query))?;

        // <D:prop>
        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
        writer.write_event(Event::Empty(BytesStart::new("D:getetag")))?;
        writer.write_event(Event::Empty(BytesStart::new("C:calendar-data")))?;
        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;

        // <C:filter><C:comp-filter name="VCALENDAR">
        writer.write_event(Event::Start(BytesStart::new("C:filter")))?;
        let mut calendar_filter = BytesStart::new("C:comp-filter");
        calendar_filter.push_attribute(("name", "VCALENDAR"));
        writer.write_event(Event::Start(calendar_filter))?;

        let mut component_filter = BytesStart::new("C:comp-filter");
        component_filter.push_attribute(("name", self.component.as_str()));
        match &self.time_range {
            Some(tr) => {
                writer.write_event(Event::Start(component_filter))?;
                let start = format_utc(tr.start);
                let end = format_utc(tr.end);
                let mut time_range = BytesStart::new("C:time-range");
                time_range.push_attribute(("start", start.as_str()));
                time_range.push_attribute(("end", end.as_str()));
                writer.write_event(Event::Empty(time_range))?;
                writer.write_event(Event::End(BytesEnd::new("C:comp-filter")))?;
            }
            None => writer.write_event(Event::Empty(component_filter))?,
        }

        writer.write_event(Event::End(BytesEnd::new("C:comp-filter")))?;
        writer.write_event(Event::End(BytesEnd::new("C:filter")))?;

        // </C:calendar-query>
        writer.write_event(Event::End(BytesEnd::new("C:calendar-query")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| CalDavError::Xml(format!("UTF-8 error: {e}")))
    }
}

/// Formats an instant as an iCalendar UTC date-time, e.g. `20250101T000000Z`.
fn format_utc(ts: Timestamp) -> String {
    ts.strftime("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_time_range_query() {
        let start: Timestamp = "2025-01-01T00:00:00Z".parse().unwrap();
        let end: Timestamp = "2025-01-06T12:30:00Z".parse().unwrap();
        let xml = CalendarQueryRequest::new("VEVENT")
            .time_range(start, end)
            .build()
            .unwrap();

        assert!(xml.starts_with("<C:calendar-query xmlns:D=\"DAV:\""));
        assert!(xml.contains("<D:getetag/>"));
        assert!(xml.contains("<C:calendar-data/>"));
        assert!(xml.contains("<C:comp-filter name=\"VCALENDAR\">"));
        assert!(xml.contains("<C:comp-filter name=\"VEVENT\">"));
        assert!(xml.contains("<C:time-range start=\"20250101T000000Z\" end=\"20250106T123000Z\"/>"));
    }

    #[test]
    fn builds_unbounded_query() {
        let xml = CalendarQueryRequest::new("VEVENT").build().unwrap();
        assert!(xml.contains("<C:comp-filter name=\"VEVENT\"/>"));
        assert!(!xml.contains("time-range"));
    }
}
