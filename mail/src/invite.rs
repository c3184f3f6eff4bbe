// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iTIP `REQUEST` invitation messages (RFC 6047).

use calbridge_ical::CalendarEvent;
use calbridge_ical::keyword::KW_METHOD_REQUEST;
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};

use crate::error::MailError;

/// Plain-text part of every invitation.
pub const INVITE_BODY: &str = "Please find the attached calendar invite.";

/// File name of the calendar attachment.
pub const INVITE_FILENAME: &str = "invite.ics";

const INVITE_CONTENT_TYPE: &str = "text/calendar; method=REQUEST; charset=utf-8";

/// Attendees who have not answered yet, excluding `sender` and duplicates.
#[must_use]
pub fn recipients(event: &CalendarEvent, sender: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for attendee in event.attendees() {
        let email = attendee.email.trim();
        if attendee.needs_action()
            && !email.eq_ignore_ascii_case(sender)
            && !out.iter().any(|e| e.eq_ignore_ascii_case(email))
        {
            out.push(email.to_string());
        }
    }
    out
}

/// Subject line of the invitation.
#[must_use]
pub fn subject(event: &CalendarEvent) -> String {
    format!("Invitation: {}", event.summary())
}

/// Builds the invitation for `event`, or `None` when nobody needs to be invited.
///
/// # Errors
///
/// Returns an error if `sender` is not a valid mailbox or the message cannot be assembled.
pub fn build_invite(event: &CalendarEvent, sender: &str) -> Result<Option<Message>, MailError> {
    let from: Mailbox = sender.parse()?;
    let mut builder = Message::builder().from(from.clone()).subject(subject(event));

    let mut any = false;
    for email in recipients(event, &from.email.to_string()) {
        match email.parse::<Mailbox>() {
            Ok(mailbox) => {
                builder = builder.to(mailbox);
                any = true;
            }
            Err(err) => tracing::warn!(%email, %err, "skipping attendee with invalid address"),
        }
    }
    if !any {
        return Ok(None);
    }

    let calendar = event.with_method(KW_METHOD_REQUEST).to_ics();
    let message = builder.multipart(
        MultiPart::mixed()
            .singlepart(SinglePart::plain(INVITE_BODY.to_string()))
            .singlepart(
                Attachment::new(INVITE_FILENAME.to_string())
                    .body(calendar, ContentType::parse(INVITE_CONTENT_TYPE)?),
            ),
    )?;
    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example//EN\r
BEGIN:VEVENT\r
UID:review@example.org\r
DTSTART:20250110T090000Z\r
DTEND:20250110T100000Z\r
SUMMARY:Design review\r
ORGANIZER:mailto:user1@example.org\r
ATTENDEE;PARTSTAT=ACCEPTED:mailto:user1@example.org\r
ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ann@example.org\r
ATTENDEE:mailto:ben@example.org\r
ATTENDEE;PARTSTAT=DECLINED:mailto:cid@example.org\r
ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:USER1@example.org\r
ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:Ann@example.org\r
END:VEVENT\r
END:VCALENDAR\r
";

    fn event(src: &str) -> CalendarEvent {
        CalendarEvent::parse(src).unwrap().remove(0)
    }

    #[test]
    fn selects_pending_attendees_except_sender() {
        assert_eq!(
            recipients(&event(EVENT), "user1@example.org"),
            vec!["ann@example.org", "ben@example.org"]
        );
    }

    #[test]
    fn builds_multipart_request() {
        let message = build_invite(&event(EVENT), "Calendar <user1@example.org>")
            .unwrap()
            .unwrap();

        let to: Vec<_> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(to, vec!["ann@example.org", "ben@example.org"]);

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Invitation: Design review"));
        assert!(raw.contains("Content-Type: multipart/mixed"));
        assert!(raw.contains(INVITE_BODY));
        assert!(raw.contains("filename=\"invite.ics\""));
        assert!(raw.contains("method=REQUEST"));
        assert!(raw.contains("METHOD:REQUEST"));
        assert!(raw.contains("UID:review@example.org"));
    }

    #[test]
    fn nobody_to_invite() {
        let src = EVENT
            .lines()
            .filter(|l| !l.starts_with("ATTENDEE") || l.contains("ACCEPTED"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(build_invite(&event(&src), "user1@example.org").unwrap().is_none());
    }

    #[test]
    fn rejects_invalid_sender() {
        assert!(matches!(
            build_invite(&event(EVENT), "not an address"),
            Err(MailError::Address(_))
        ));
    }
}
