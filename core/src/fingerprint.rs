// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content fingerprints identifying one revision of an event.

use calbridge_ical::{CalendarEvent, Participant};
use md5::{Digest, Md5};

use crate::error::FingerprintError;

const UNIT_SEPARATOR: u8 = 0x1F;

/// UID and fingerprint of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIdentity {
    /// The single `UID` of the event.
    pub uid: String,
    /// Hex MD5 over the event's semantic fields.
    pub fingerprint: String,
}

/// Computes the UID and fingerprint of `event`.
///
/// # Errors
///
/// Fails with [`FingerprintError::Identity`] unless there is exactly one `VEVENT` with
/// exactly one `UID`, and with [`FingerprintError::IncompleteEvent`] when the start or
/// end time is missing or unreadable.
pub fn identify(event: &CalendarEvent) -> Result<EventIdentity, FingerprintError> {
    let uid = single_uid(event)?;
    let start = event.start().map_err(FingerprintError::IncompleteEvent)?;
    let end = event.end().map_err(FingerprintError::IncompleteEvent)?;

    let mut buf = Vec::new();
    push_field(&mut buf, &uid);
    push_participants(&mut buf, &event.attendees());
    push_participants(&mut buf, &event.organizers());
    push_field(&mut buf, &event.description());
    push_field(&mut buf, &event.summary());
    push_field(&mut buf, &start.to_string());
    push_field(&mut buf, &end.to_string());

    Ok(EventIdentity {
        uid,
        fingerprint: hex::encode(Md5::digest(&buf)),
    })
}

/// The fingerprint of `event`, as 32 lower-case hex characters.
///
/// # Errors
///
/// See [`identify`].
pub fn fingerprint(event: &CalendarEvent) -> Result<String, FingerprintError> {
    identify(event).map(|identity| identity.fingerprint)
}

fn single_uid(event: &CalendarEvent) -> Result<String, FingerprintError> {
    let events = event.events().count();
    let uids = event.uids();
    match (events, uids.as_slice()) {
        (1, [uid]) => Ok((*uid).to_string()),
        _ => Err(FingerprintError::Identity {
            events,
            uids: uids.len(),
        }),
    }
}

fn push_field(buf: &mut Vec<u8>, field: &str) {
    buf.extend_from_slice(field.as_bytes());
    buf.push(UNIT_SEPARATOR);
}

/// Writes every `email, status` pair in sorted order, closed by an empty field.
///
/// A repeated address keeps all of its pairs.
fn push_participants(buf: &mut Vec<u8>, participants: &[Participant]) {
    let mut sorted: Vec<(String, &str)> = participants
        .iter()
        .map(|p| {
            (
                p.email.trim().to_ascii_lowercase(),
                p.status.as_deref().unwrap_or(""),
            )
        })
        .collect();
    sorted.sort_unstable();

    for (email, status) in &sorted {
        push_field(buf, email);
        push_field(buf, status);
    }
    push_field(buf, "");
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
BEGIN:VEVENT\r
UID:standup@example.org\r
DTSTART;TZID=Europe/Berlin:20250110T100000\r
DTEND:20250110T093000Z\r
SUMMARY:Standup\r
DESCRIPTION:Daily sync\r
ORGANIZER:mailto:boss@example.org\r
ATTENDEE;PARTSTAT=ACCEPTED:mailto:ann@example.org\r
ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ben@example.org\r
END:VEVENT\r
END:VCALENDAR\r
";

    fn event(src: &str) -> CalendarEvent {
        CalendarEvent::parse(src).unwrap().remove(0)
    }

    fn replace(src: &str, from: &str, to: &str) -> CalendarEvent {
        event(&src.replace(from, to))
    }

    #[test]
    fn fingerprint_is_lower_hex_md5() {
        let identity = identify(&event(EVENT)).unwrap();
        assert_eq!(identity.uid, "standup@example.org");
        assert_eq!(identity.fingerprint.len(), 32);
        assert!(
            identity
                .fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn fingerprint_ignores_attendee_order() {
        let swapped = EVENT
            .replace(
                "ATTENDEE;PARTSTAT=ACCEPTED:mailto:ann@example.org",
                "@@ANN@@",
            )
            .replace(
                "ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ben@example.org",
                "ATTENDEE;PARTSTAT=ACCEPTED:mailto:ann@example.org",
            )
            .replace(
                "@@ANN@@",
                "ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ben@example.org",
            );
        assert_ne!(swapped, EVENT);
        assert_eq!(
            fingerprint(&event(EVENT)).unwrap(),
            fingerprint(&event(&swapped)).unwrap()
        );
    }

    #[test]
    fn fingerprint_keeps_every_reply_of_a_repeated_attendee() {
        let repeated = EVENT.replace(
            "ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ben@example.org",
            "ATTENDEE;PARTSTAT=DECLINED:mailto:Ann@example.org",
        );
        let swapped = repeated
            .replace(
                "ATTENDEE;PARTSTAT=ACCEPTED:mailto:ann@example.org",
                "@@ANN@@",
            )
            .replace(
                "ATTENDEE;PARTSTAT=DECLINED:mailto:Ann@example.org",
                "ATTENDEE;PARTSTAT=ACCEPTED:mailto:ann@example.org",
            )
            .replace(
                "@@ANN@@",
                "ATTENDEE;PARTSTAT=DECLINED:mailto:Ann@example.org",
            );
        assert_ne!(swapped, repeated);
        assert_eq!(
            fingerprint(&event(&repeated)).unwrap(),
            fingerprint(&event(&swapped)).unwrap()
        );

        let single = replace(
            EVENT,
            "ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ben@example.org\r\n",
            "",
        );
        assert_ne!(
            fingerprint(&event(&repeated)).unwrap(),
            fingerprint(&single).unwrap()
        );
    }

    #[test]
    fn fingerprint_is_stable_across_time_zone_spelling() {
        // 10:00 in Berlin during winter is 09:00 UTC
        let utc = replace(
            EVENT,
            "DTSTART;TZID=Europe/Berlin:20250110T100000",
            "DTSTART:20250110T090000Z",
        );
        assert_eq!(
            fingerprint(&event(EVENT)).unwrap(),
            fingerprint(&utc).unwrap()
        );
    }

    #[test]
    fn fingerprint_changes_with_partstat() {
        let accepted = replace(EVENT, "PARTSTAT=NEEDS-ACTION", "PARTSTAT=ACCEPTED");
        assert_ne!(
            fingerprint(&event(EVENT)).unwrap(),
            fingerprint(&accepted).unwrap()
        );
    }

    #[test]
    fn fingerprint_changes_with_summary_and_times() {
        let base = fingerprint(&event(EVENT)).unwrap();
        let renamed = replace(EVENT, "SUMMARY:Standup", "SUMMARY:Retro");
        let moved = replace(EVENT, "DTEND:20250110T093000Z", "DTEND:20250110T094500Z");
        assert_ne!(base, fingerprint(&renamed).unwrap());
        assert_ne!(base, fingerprint(&moved).unwrap());
    }

    #[test]
    fn attendee_and_organizer_fields_do_not_run_together() {
        let as_organizer = replace(
            EVENT,
            "ATTENDEE;PARTSTAT=ACCEPTED:mailto:ann@example.org",
            "ORGANIZER;PARTSTAT=ACCEPTED:mailto:ann@example.org",
        );
        assert_ne!(
            fingerprint(&event(EVENT)).unwrap(),
            fingerprint(&as_organizer).unwrap()
        );
    }

    #[test]
    fn duration_stands_in_for_dtend() {
        let with_duration = replace(EVENT, "DTEND:20250110T093000Z", "DURATION:PT30M");
        assert_eq!(
            fingerprint(&event(EVENT)).unwrap(),
            fingerprint(&with_duration).unwrap()
        );
    }

    #[test]
    fn missing_end_is_incomplete() {
        let open = replace(EVENT, "DTEND:20250110T093000Z\r\n", "");
        assert!(matches!(
            identify(&open),
            Err(FingerprintError::IncompleteEvent(_))
        ));
    }

    #[test]
    fn requires_exactly_one_uid() {
        let no_uid = replace(EVENT, "UID:standup@example.org\r\n", "");
        assert_eq!(
            identify(&no_uid),
            Err(FingerprintError::Identity { events: 1, uids: 0 })
        );

        let two_uids = replace(
            EVENT,
            "UID:standup@example.org\r\n",
            "UID:a@example.org\r\nUID:b@example.org\r\n",
        );
        assert_eq!(
            identify(&two_uids),
            Err(FingerprintError::Identity { events: 1, uids: 2 })
        );
    }

    #[test]
    fn requires_exactly_one_event() {
        let body = EVENT
            .split_once("BEGIN:VEVENT")
            .and_then(|(_, rest)| rest.split_once("END:VEVENT"))
            .map(|(body, _)| body)
            .unwrap();
        let doubled = EVENT.replace(
            "END:VCALENDAR",
            &format!("BEGIN:VEVENT{body}END:VEVENT\r\nEND:VCALENDAR"),
        );
        assert_eq!(
            identify(&event(&doubled)),
            Err(FingerprintError::Identity { events: 2, uids: 2 })
        );
    }
}
