// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Which flow claimed a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Calendar event mailed out as an invitation.
    #[serde(rename = "out")]
    Outbound,

    /// Received invitation written to the calendar.
    #[serde(rename = "in")]
    Inbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => write!(f, "out"),
            Direction::Inbound => write!(f, "in"),
        }
    }
}

/// Sync state of one (owner, uid, fingerprint) triple.
///
/// Field order is also the column order of the flat-file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Profile name the record belongs to.
    pub owner: String,
    /// `UID` of the event.
    pub uid: String,
    /// Content fingerprint of the event.
    pub fingerprint: String,
    /// Flow that first handled the event; set once.
    pub direction: Option<Direction>,
    /// Time of the last successful action, meaningful only when `synced`.
    pub synced_at: Option<Timestamp>,
    /// Whether the action has been performed.
    pub synced: bool,
}

impl SyncRecord {
    /// A record that has never been synced.
    pub fn new(
        owner: impl Into<String>,
        uid: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            uid: uid.into(),
            fingerprint: fingerprint.into(),
            direction: None,
            synced_at: None,
            synced: false,
        }
    }

    /// Storage key within the owner's partition.
    #[must_use]
    pub fn key(&self) -> String {
        record_key(&self.uid, &self.fingerprint)
    }

    /// Whether `direction` still has to act on this record.
    #[must_use]
    pub fn is_pending_for(&self, direction: Direction) -> bool {
        !self.synced && self.direction.is_none_or(|d| d == direction)
    }

    /// Records a successful action; the direction is kept if already claimed.
    pub fn mark_synced(&mut self, direction: Direction, at: Timestamp) {
        if self.direction.is_none() {
            self.direction = Some(direction);
        }
        self.synced = true;
        self.synced_at = Some(at);
    }
}

pub(crate) fn record_key(uid: &str, fingerprint: &str) -> String {
    format!("{uid}:{fingerprint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_pending_both_ways() {
        let record = SyncRecord::new("user1", "uid-1", "abc");
        assert!(record.is_pending_for(Direction::Outbound));
        assert!(record.is_pending_for(Direction::Inbound));
        assert_eq!(record.key(), "uid-1:abc");
    }

    #[test]
    fn mark_synced_keeps_first_direction() {
        let at: Timestamp = "2025-01-10T08:00:00Z".parse().unwrap();
        let mut record = SyncRecord::new("user1", "uid-1", "abc");
        record.direction = Some(Direction::Inbound);
        record.mark_synced(Direction::Outbound, at);

        assert_eq!(record.direction, Some(Direction::Inbound));
        assert!(record.synced);
        assert_eq!(record.synced_at, Some(at));
    }

    #[test]
    fn claimed_record_blocks_other_direction() {
        let mut record = SyncRecord::new("user1", "uid-1", "abc");
        record.direction = Some(Direction::Outbound);
        assert!(record.is_pending_for(Direction::Outbound));
        assert!(!record.is_pending_for(Direction::Inbound));
    }

    #[test]
    fn serializes_direction_as_short_name() {
        let mut record = SyncRecord::new("user1", "uid-1", "abc");
        record.mark_synced(Direction::Outbound, "2025-01-10T08:00:00Z".parse().unwrap());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""direction":"out""#));
        assert!(json.contains(r#""synced_at":"2025-01-10T08:00:00Z""#));
        assert_eq!(serde_json::from_str::<SyncRecord>(&json).unwrap(), record);
    }
}
