// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` client for calendar operations.

use calbridge_ical::CalendarEvent;
use calbridge_ical::keyword::KW_VEVENT;
use jiff::Timestamp;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;

use crate::config::CalDavConfig;
use crate::error::CalDavError;
use crate::http::HttpClient;
use crate::request::CalendarQueryRequest;
use crate::response::MultiStatusResponse;
use crate::types::{CalendarResource, ETag, Href};

/// Characters kept verbatim when a UID becomes a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@');

/// `CalDAV` client for one calendar collection.
///
/// # Example
///
/// ```no_run
/// use calbridge_caldav::{AuthMethod, CalDavClient, CalDavConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CalDavConfig {
///     base_url: "https://caldav.example.com".to_string(),
///     calendar_path: "/calendars/user/personal/".to_string(),
///     auth: AuthMethod::Digest {
///         username: "user".to_string(),
///         password: "pass".to_string(),
///     },
///     ..Default::default()
/// };
///
/// let client = CalDavClient::new(config)?;
/// let now = jiff::Timestamp::now();
/// let events = client.list_events(now, now).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CalDavClient {
    http: HttpClient,
    config: CalDavConfig,
}

impl CalDavClient {
    /// Creates a new `CalDAV` client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: CalDavConfig) -> Result<Self, CalDavError> {
        let http = HttpClient::new(&config)?;
        Ok(Self { http, config })
    }

    /// Lists events overlapping `[start, end)` with a `calendar-query` REPORT.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the multistatus body is not valid XML.
    pub async fn list_events(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<CalendarResource>, CalDavError> {
        let url = self.full_url(&self.config.calendar_path);
        let xml_body = CalendarQueryRequest::new(KW_VEVENT)
            .time_range(start, end)
            .build()?;

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(
                        Method::from_bytes(b"REPORT")
                            .map_err(|e| CalDavError::Http(format!("Invalid method: {e}")))?,
                        &url,
                    )
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .header("Depth", "1")
                    .body(xml_body),
            )
            .await?;

        let xml = resp.text().await?;
        let resources = MultiStatusResponse::from_xml(&xml)?.into_resources();
        tracing::debug!(count = resources.len(), %start, %end, "listed calendar events");
        Ok(resources)
    }

    /// Stores `event` at `{calendar_path}{uid}.ics`, creating or replacing it.
    ///
    /// Returns the new `ETag` if the server sent one.
    ///
    /// # Errors
    ///
    /// Returns an error if the event has no UID or the request fails.
    pub async fn put_event(&self, event: &CalendarEvent) -> Result<Option<ETag>, CalDavError> {
        let uid = event
            .uids()
            .first()
            .map(|uid| (*uid).to_string())
            .ok_or_else(|| CalDavError::Ical("event has no UID".to_string()))?;
        let url = self.full_url(self.event_href(&uid).as_str());

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(Method::PUT, &url)
                    .header("Content-Type", "text/calendar; charset=utf-8")
                    .body(event.to_ics()),
            )
            .await?;

        Ok(resp
            .headers()
            .get("ETag")
            .and_then(|v| v.to_str().ok())
            .map(ETag::new))
    }

    /// Deletes the event stored under `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::NotFound`] if there is no such event, or another error if the
    /// request fails.
    pub async fn delete_event(&self, uid: &str) -> Result<(), CalDavError> {
        let url = self.full_url(self.event_href(uid).as_str());
        self.http
            .execute(self.http.build_request(Method::DELETE, &url))
            .await?;
        Ok(())
    }

    /// The resource path an event with `uid` is stored under.
    #[must_use]
    pub fn event_href(&self, uid: &str) -> Href {
        let path = &self.config.calendar_path;
        let separator = if path.ends_with('/') { "" } else { "/" };
        Href::new(format!(
            "{path}{separator}{}.ics",
            utf8_percent_encode(uid, SEGMENT)
        ))
    }

    /// Builds full URL from href.
    fn full_url(&self, href: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(calendar_path: &str) -> CalDavClient {
        CalDavClient::new(CalDavConfig {
            base_url: "https://dav.example.com/".to_string(),
            calendar_path: calendar_path.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn event_href_encodes_uid_as_one_segment() {
        let client = client("/calendars/alice/work/");
        assert_eq!(
            client.event_href("meeting-42@example.com").as_str(),
            "/calendars/alice/work/meeting-42@example.com.ics"
        );
        assert_eq!(
            client.event_href("a/b c").as_str(),
            "/calendars/alice/work/a%2Fb%20c.ics"
        );
    }

    #[test]
    fn event_href_adds_missing_slash() {
        let client = client("/calendars/alice/work");
        assert_eq!(
            client.event_href("x").as_str(),
            "/calendars/alice/work/x.ics"
        );
        assert_eq!(
            client.full_url("/calendars/alice/work/x.ics"),
            "https://dav.example.com/calendars/alice/work/x.ics"
        );
    }
}
