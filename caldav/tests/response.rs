// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsing tests.

use calbridge_caldav::MultiStatusResponse;

const EVENT_ICS: &str = "BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Example//EN
BEGIN:VEVENT
UID:event-1@example.com
DTSTAMP:20250110T080000Z
DTSTART:20250115T090000Z
DTEND:20250115T100000Z
SUMMARY:Planning &amp; review
END:VEVENT
END:VCALENDAR
";

#[test]
fn response_parse_multistatus_basic() {
    let xml = "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\">
  <D:response>
    <D:href>/calendars/user/event1.ics</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"12345\"</D:getetag>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>";

    let response = MultiStatusResponse::from_xml(xml).expect("Failed to parse multistatus");

    assert_eq!(response.responses.len(), 1);
    let item = &response.responses[0];
    assert_eq!(item.href.as_str(), "/calendars/user/event1.ics");
    assert_eq!(item.status, None);
    assert_eq!(item.prop_stats.len(), 1);
    assert_eq!(item.prop_stats[0].status, "HTTP/1.1 200 OK");
    assert_eq!(item.prop_stats[0].etag.as_ref().unwrap().as_str(), "\"12345\"");
    assert_eq!(item.prop_stats[0].calendar_data, None);
}

#[test]
fn response_parse_other_namespace_prefixes() {
    let xml = format!(
        "\
<multistatus xmlns=\"DAV:\" xmlns:cal=\"urn:ietf:params:xml:ns:caldav\">
  <response>
    <href>/cal/event1.ics</href>
    <propstat>
      <prop>
        <getetag>\"abc\"</getetag>
        <cal:calendar-data>{EVENT_ICS}</cal:calendar-data>
      </prop>
      <status>HTTP/1.1 200 OK</status>
    </propstat>
  </response>
</multistatus>"
    );

    let resources = MultiStatusResponse::from_xml(&xml)
        .expect("Failed to parse multistatus")
        .into_resources();

    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].href.as_str(), "/cal/event1.ics");
    assert_eq!(resources[0].etag.as_str(), "\"abc\"");
    assert_eq!(resources[0].data.uids(), vec!["event-1@example.com"]);
    assert_eq!(resources[0].data.summary(), "Planning & review");
}

#[test]
fn response_into_resources_skips_failed_and_broken_objects() {
    let xml = format!(
        "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\" xmlns:C=\"urn:ietf:params:xml:ns:caldav\">
  <D:response>
    <D:href>/calendars/user/good.ics</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"1\"</D:getetag>
        <C:calendar-data>{EVENT_ICS}</C:calendar-data>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
    <D:propstat>
      <D:prop>
        <D:displayname/>
      </D:prop>
      <D:status>HTTP/1.1 404 Not Found</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/calendars/user/broken.ics</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"2\"</D:getetag>
        <C:calendar-data>BEGIN:VCALENDAR
BEGIN:VEVENT
UID:broken
END:VCALENDAR
</C:calendar-data>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/calendars/user/gone.ics</D:href>
    <D:status>HTTP/1.1 404 Not Found</D:status>
  </D:response>
</D:multistatus>"
    );

    let response = MultiStatusResponse::from_xml(&xml).expect("Failed to parse multistatus");
    assert_eq!(response.responses.len(), 3);
    assert_eq!(
        response.responses[2].status.as_deref(),
        Some("HTTP/1.1 404 Not Found")
    );

    let resources = response.into_resources();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].href.as_str(), "/calendars/user/good.ics");
}

#[test]
fn response_parse_empty_multistatus() {
    let xml = "<D:multistatus xmlns:D=\"DAV:\"/>";
    let response = MultiStatusResponse::from_xml(xml).expect("Failed to parse multistatus");
    assert!(response.responses.is_empty());
    assert!(response.into_resources().is_empty());
}

#[test]
fn response_parse_rejects_mismatched_tags() {
    let xml = "<D:multistatus xmlns:D=\"DAV:\"><D:response></D:multistatus>";
    assert!(MultiStatusResponse::from_xml(xml).is_err());
}
