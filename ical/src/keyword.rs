// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Keywords defined in iCalendar RFC 5545 and RFC 5546 that calbridge reads or writes.

pub const KW_BEGIN: &str = "BEGIN";
pub const KW_END: &str = "END";

// Section 3.4 / 3.6 - Components
pub const KW_VCALENDAR: &str = "VCALENDAR";
pub const KW_VEVENT: &str = "VEVENT";

// Section 3.2 - Property Parameters
pub const KW_PARTSTAT: &str = "PARTSTAT";
pub const KW_TZID: &str = "TZID";
pub const KW_VALUE: &str = "VALUE";

// Section 3.3 - Property Value Data Types
pub const KW_DATE: &str = "DATE";

// Section 3.2.12 - Participation Status
pub const KW_PARTSTAT_NEEDS_ACTION: &str = "NEEDS-ACTION";

// Section 3.7 - Calendar Properties
pub const KW_METHOD: &str = "METHOD";

// Section 3.8 - Component Properties
pub const KW_ATTENDEE: &str = "ATTENDEE";
pub const KW_DESCRIPTION: &str = "DESCRIPTION";
pub const KW_DTEND: &str = "DTEND";
pub const KW_DTSTART: &str = "DTSTART";
pub const KW_DURATION: &str = "DURATION";
pub const KW_ORGANIZER: &str = "ORGANIZER";
pub const KW_SUMMARY: &str = "SUMMARY";
pub const KW_UID: &str = "UID";

// RFC 5546 Section 1.4 - Methods
pub const KW_METHOD_CANCEL: &str = "CANCEL";
pub const KW_METHOD_REQUEST: &str = "REQUEST";

/// URI scheme prefix of calendar user addresses.
pub const MAILTO_PREFIX: &str = "mailto:";
