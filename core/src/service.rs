// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Collaborators the orchestrator drives, and their implementations for the `CalDAV` and
//! mail clients.

use async_trait::async_trait;
use calbridge_caldav::CalDavClient;
use calbridge_ical::CalendarEvent;
use calbridge_mail::{ImapReader, SmtpSender};
use jiff::{SignedDuration, Timestamp};

use crate::error::CollaboratorError;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: Timestamp,
    /// Exclusive upper bound.
    pub end: Timestamp,
}

impl TimeWindow {
    /// From one day before `now` until `days` days after it.
    #[must_use]
    pub fn upcoming(now: Timestamp, days: u32) -> Self {
        Self {
            start: now - SignedDuration::from_hours(24),
            end: now + SignedDuration::from_hours(24 * i64::from(days)),
        }
    }
}

/// Calendar the events are read from and written to.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Events overlapping `window`.
    async fn list_events(&self, window: TimeWindow)
    -> Result<Vec<CalendarEvent>, CollaboratorError>;

    /// Creates or replaces the event.
    async fn upsert_event(&self, event: &CalendarEvent) -> Result<(), CollaboratorError>;

    /// Deletes the event with `uid`.
    async fn remove_event(&self, uid: &str) -> Result<(), CollaboratorError>;
}

/// Mails invitations.
#[async_trait]
pub trait InviteSender: Send + Sync {
    /// Sends `event` to its attendees awaiting a response.
    async fn send_invite(&self, event: &CalendarEvent) -> Result<(), CollaboratorError>;
}

/// Reads received invitations.
#[async_trait]
pub trait InviteReader: Send + Sync {
    /// Calendar objects from messages received within the last `window_hours` hours.
    async fn read_invites(&self, window_hours: u32)
    -> Result<Vec<CalendarEvent>, CollaboratorError>;
}

#[async_trait]
impl CalendarService for CalDavClient {
    async fn list_events(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<CalendarEvent>, CollaboratorError> {
        let resources = CalDavClient::list_events(self, window.start, window.end).await?;
        Ok(resources.into_iter().map(|r| r.data).collect())
    }

    async fn upsert_event(&self, event: &CalendarEvent) -> Result<(), CollaboratorError> {
        self.put_event(event).await?;
        Ok(())
    }

    async fn remove_event(&self, uid: &str) -> Result<(), CollaboratorError> {
        self.delete_event(uid).await?;
        Ok(())
    }
}

#[async_trait]
impl InviteSender for SmtpSender {
    async fn send_invite(&self, event: &CalendarEvent) -> Result<(), CollaboratorError> {
        SmtpSender::send_invite(self, event).await?;
        Ok(())
    }
}

#[async_trait]
impl InviteReader for ImapReader {
    async fn read_invites(
        &self,
        window_hours: u32,
    ) -> Result<Vec<CalendarEvent>, CollaboratorError> {
        Ok(ImapReader::read_invites(self, window_hours).await?)
    }
}
