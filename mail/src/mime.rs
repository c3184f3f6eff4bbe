// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use calbridge_ical::CalendarEvent;
use mailparse::{MailHeaderMap, ParsedMail, dateparse, parse_headers, parse_mail};

use crate::error::MailError;

const CALENDAR_TYPES: [&str; 2] = ["text/calendar", "application/ics"];

/// Extracts every calendar object carried by a raw RFC 5322 message.
///
/// All MIME parts are visited; a calendar part that fails to parse is logged and skipped.
///
/// # Errors
///
/// Returns an error if the message itself is not valid MIME.
pub fn extract_invites(raw: &[u8]) -> Result<Vec<CalendarEvent>, MailError> {
    let mail = parse_mail(raw)?;
    let mut invites = Vec::new();
    collect(&mail, &mut invites)?;
    Ok(invites)
}

fn collect(part: &ParsedMail<'_>, invites: &mut Vec<CalendarEvent>) -> Result<(), MailError> {
    if CALENDAR_TYPES.contains(&part.ctype.mimetype.as_str()) {
        let body = part.get_body()?;
        match CalendarEvent::parse(&body) {
            Ok(events) => invites.extend(events),
            Err(err) => tracing::warn!(%err, "skipping unparsable calendar part"),
        }
    }
    for sub in &part.subparts {
        collect(sub, invites)?;
    }
    Ok(())
}

/// Whether the message `Date` header is at or after `since` (Unix seconds).
///
/// Messages without a usable `Date` header are kept.
#[must_use]
pub fn received_since(raw: &[u8], since: i64) -> bool {
    let Ok((headers, _)) = parse_headers(raw) else {
        return true;
    };
    headers
        .get_first_value("Date")
        .and_then(|date| dateparse(&date).ok())
        .is_none_or(|sent| sent >= since)
}
