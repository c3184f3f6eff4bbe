// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for WebDAV/CalDAV operations.

use calbridge_ical::CalendarEvent;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::CalDavError;
use crate::types::{CalendarResource, ETag, Href};
use crate::xml::read_text;

/// `WebDAV` multistatus response.
#[derive(Debug, Clone, Default)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone, Default)]
pub struct ResponseItem {
    /// The resource the response is about.
    pub href: Href,
    /// Property groups by status.
    pub prop_stats: Vec<PropStat>,
    /// Response-level status, sent instead of propstats for missing resources.
    pub status: Option<String>,
}

/// Properties sharing one status.
#[derive(Debug, Clone, Default)]
pub struct PropStat {
    /// `DAV:getetag`.
    pub etag: Option<ETag>,
    /// `C:calendar-data`.
    pub calendar_data: Option<String>,
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn from_xml(xml: &str) -> Result<Self, CalDavError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().check_end_names = true;

        let mut responses = Vec::new();
        let mut current: Option<ResponseItem> = None;
        let mut prop_stat: Option<PropStat> = None;

        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Start(e) => match e.name().local_name().into_inner() {
                    b"response" => current = Some(ResponseItem::default()),
                    b"propstat" if current.is_some() => prop_stat = Some(PropStat::default()),
                    b"href" => {
                        let text = read_text(&mut reader)?;
                        if let Some(resp) = current.as_mut().filter(|_| prop_stat.is_none()) {
                            resp.href = Href::new(text.trim());
                        }
                    }
                    b"getetag" => {
                        let text = read_text(&mut reader)?;
                        if let Some(ps) = prop_stat.as_mut() {
                            ps.etag = Some(ETag::new(text.trim()));
                        }
                    }
                    b"calendar-data" => {
                        let text = read_text(&mut reader)?;
                        if let Some(ps) = prop_stat.as_mut() {
                            ps.calendar_data = Some(text);
                        }
                    }
                    b"status" => {
                        let text = read_text(&mut reader)?.trim().to_string();
                        if let Some(ps) = prop_stat.as_mut() {
                            ps.status = text;
                        } else if let Some(resp) = current.as_mut() {
                            resp.status = Some(text);
                        }
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().local_name().into_inner() {
                    b"propstat" => {
                        if let (Some(ps), Some(resp)) = (prop_stat.take(), current.as_mut()) {
                            resp.prop_stats.push(ps);
                        }
                    }
                    b"response" => {
                        if let Some(resp) = current.take() {
                            responses.push(resp);
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(Self { responses })
    }

    /// Converts multistatus response to calendar resources.
    ///
    /// Only successful propstats carrying calendar data are used. A resource whose data does
    /// not parse is logged and skipped so one bad object cannot hide the others.
    #[must_use]
    pub fn into_resources(self) -> Vec<CalendarResource> {
        let mut resources = Vec::new();

        for response in self.responses {
            for prop_stat in response.prop_stats {
                if !is_success(&prop_stat.status) {
                    continue;
                }
                let Some(data) = prop_stat.calendar_data else {
                    continue;
                };

                match CalendarEvent::parse(&data) {
                    Ok(calendars) => {
                        for calendar in calendars {
                            resources.push(CalendarResource {
                                href: response.href.clone(),
                                etag: prop_stat.etag.clone().unwrap_or_default(),
                                data: calendar,
                            });
                        }
                    }
                    Err(err) => {
                        tracing::warn!(href = %response.href, %err, "skipping unparsable calendar object");
                    }
                }
            }
        }

        resources
    }
}

/// Whether a `HTTP/1.1 200 OK` style status line carries a 2xx code.
fn is_success(status: &str) -> bool {
    status
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .is_some_and(|code| (200..300).contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_codes() {
        assert!(is_success("HTTP/1.1 200 OK"));
        assert!(is_success("HTTP/1.1 207 Multi-Status"));
        assert!(!is_success("HTTP/1.1 404 Not Found"));
        assert!(!is_success("garbage"));
        assert!(!is_success(""));
    }
}
