// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Outbound (calendar to mail) and inbound (mail to calendar) sync passes.

use calbridge_ical::CalendarEvent;
use jiff::Timestamp;

use crate::error::{CollaboratorError, FingerprintError, StoreError, SyncError};
use crate::fingerprint::identify;
use crate::record::{Direction, SyncRecord};
use crate::service::{CalendarService, InviteReader, InviteSender, TimeWindow};
use crate::store::SyncStore;

/// Outcome of one pass.
#[derive(Debug)]
pub struct SyncReport {
    /// Flow the report belongs to.
    pub direction: Direction,
    /// Actions performed, or in a dry run, actions that would have been.
    pub actions: usize,
    /// Events already handled by an earlier run or by the other flow.
    pub skipped: usize,
    /// Events that could not be handled.
    pub failures: Vec<EventFailure>,
}

impl SyncReport {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            actions: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every event was handled.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An event the pass gave up on.
#[derive(Debug)]
pub struct EventFailure {
    /// `UID` of the event, when it could be determined.
    pub uid: Option<String>,
    /// What went wrong.
    pub reason: FailureReason,
}

/// Why an event failed.
#[derive(Debug, thiserror::Error)]
pub enum FailureReason {
    /// The event has no usable identity.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    /// Its sync state could not be read.
    #[error("sync state lookup failed: {0}")]
    Lookup(#[source] StoreError),

    /// Sending, writing or deleting failed; the event stays pending.
    #[error("action failed: {0}")]
    Action(#[source] CollaboratorError),

    /// The action happened but was not recorded, so the next run may repeat it.
    #[error("action performed but not recorded: {0}")]
    Unrecorded(#[source] StoreError),
}

impl FailureReason {
    /// Whether the next run may perform the action a second time.
    #[must_use]
    pub fn duplicate_risk(&self) -> bool {
        matches!(self, FailureReason::Unrecorded(_))
    }
}

/// Drives both sync flows for one owner.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    owner: &'a str,
    store: &'a dyn SyncStore,
    dry_run: bool,
}

impl<'a> Orchestrator<'a> {
    /// An orchestrator recording state for `owner` in `store`.
    #[must_use]
    pub fn new(owner: &'a str, store: &'a dyn SyncStore) -> Self {
        Self {
            owner,
            store,
            dry_run: false,
        }
    }

    /// Only log the actions that would be taken.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Mails every pending event starting within `[now - 1 day, now + event_days]`.
    ///
    /// # Errors
    ///
    /// Fails only when the calendar cannot be listed or the store is closed; per-event
    /// problems are collected in the report.
    pub async fn send_invites(
        &self,
        calendar: &dyn CalendarService,
        sender: &dyn InviteSender,
        event_days: u32,
    ) -> Result<SyncReport, SyncError> {
        let window = TimeWindow::upcoming(Timestamp::now(), event_days);
        let events = calendar.list_events(window).await?;
        tracing::debug!(owner = self.owner, count = events.len(), "listed calendar events");

        let mut report = SyncReport::new(Direction::Outbound);
        for event in &events {
            let Some(record) = self.claim(event, Direction::Outbound, &mut report).await? else {
                continue;
            };

            if self.dry_run {
                tracing::info!(
                    owner = self.owner,
                    uid = %record.uid,
                    "dry run: would send invitation"
                );
                report.actions += 1;
                continue;
            }

            if let Err(err) = sender.send_invite(event).await {
                tracing::warn!(
                    owner = self.owner,
                    uid = %record.uid,
                    %err,
                    "failed to send invitation"
                );
                report.failures.push(EventFailure {
                    uid: Some(record.uid),
                    reason: FailureReason::Action(err),
                });
                continue;
            }

            tracing::info!(
                owner = self.owner,
                uid = %record.uid,
                fingerprint = %record.fingerprint,
                "invitation sent"
            );
            self.mark_synced(record, Direction::Outbound, &mut report).await;
        }
        Ok(report)
    }

    /// Writes every pending invitation received within the last `email_hours` hours to the
    /// calendar, or removes the event when the invitation is a cancellation.
    ///
    /// A failed removal is logged and still recorded as synced.
    ///
    /// # Errors
    ///
    /// Fails only when the mailbox cannot be read or the store is closed; per-event
    /// problems are collected in the report.
    pub async fn import_invites(
        &self,
        reader: &dyn InviteReader,
        calendar: &dyn CalendarService,
        email_hours: u32,
    ) -> Result<SyncReport, SyncError> {
        let invites = reader.read_invites(email_hours).await?;
        tracing::debug!(owner = self.owner, count = invites.len(), "read invitations");

        let mut report = SyncReport::new(Direction::Inbound);
        for event in &invites {
            let Some(record) = self.claim(event, Direction::Inbound, &mut report).await? else {
                continue;
            };

            if event.is_cancellation() {
                if self.dry_run {
                    tracing::info!(
                        owner = self.owner,
                        uid = %record.uid,
                        "dry run: would remove cancelled event"
                    );
                    report.actions += 1;
                    continue;
                }
                match calendar.remove_event(&record.uid).await {
                    Ok(()) => {
                        tracing::info!(owner = self.owner, uid = %record.uid, "removed cancelled event");
                    }
                    Err(err) => {
                        tracing::warn!(
                            owner = self.owner,
                            uid = %record.uid,
                            %err,
                            "could not remove cancelled event, marking it synced anyway"
                        );
                    }
                }
            } else {
                if self.dry_run {
                    tracing::info!(
                        owner = self.owner,
                        uid = %record.uid,
                        "dry run: would add event"
                    );
                    report.actions += 1;
                    continue;
                }
                if let Err(err) = calendar.upsert_event(&event.without_method()).await {
                    tracing::warn!(
                        owner = self.owner,
                        uid = %record.uid,
                        %err,
                        "failed to add event"
                    );
                    report.failures.push(EventFailure {
                        uid: Some(record.uid),
                        reason: FailureReason::Action(err),
                    });
                    continue;
                }
                tracing::info!(
                    owner = self.owner,
                    uid = %record.uid,
                    fingerprint = %record.fingerprint,
                    "event added"
                );
            }

            self.mark_synced(record, Direction::Inbound, &mut report).await;
        }
        Ok(report)
    }

    /// The record of `event` if `direction` still has to act on it.
    async fn claim(
        &self,
        event: &CalendarEvent,
        direction: Direction,
        report: &mut SyncReport,
    ) -> Result<Option<SyncRecord>, SyncError> {
        let identity = match identify(event) {
            Ok(identity) => identity,
            Err(err) => {
                let uid = event.uids().first().map(|uid| (*uid).to_string());
                tracing::warn!(owner = self.owner, uid = ?uid, %err, "skipping event");
                report.failures.push(EventFailure {
                    uid,
                    reason: err.into(),
                });
                return Ok(None);
            }
        };

        let record = match self
            .store
            .get(self.owner, &identity.uid, &identity.fingerprint)
            .await
        {
            Ok(record) => record,
            Err(StoreError::Closed) => return Err(StoreError::Closed.into()),
            Err(err) => {
                tracing::warn!(
                    owner = self.owner,
                    uid = %identity.uid,
                    %err,
                    "could not read sync state"
                );
                report.failures.push(EventFailure {
                    uid: Some(identity.uid),
                    reason: FailureReason::Lookup(err),
                });
                return Ok(None);
            }
        };

        if record.is_pending_for(direction) {
            Ok(Some(record))
        } else {
            tracing::debug!(
                owner = self.owner,
                uid = %record.uid,
                fingerprint = %record.fingerprint,
                claimed = ?record.direction,
                synced = record.synced,
                "already handled"
            );
            report.skipped += 1;
            Ok(None)
        }
    }

    async fn mark_synced(
        &self,
        mut record: SyncRecord,
        direction: Direction,
        report: &mut SyncReport,
    ) {
        report.actions += 1;
        record.mark_synced(direction, Timestamp::now());
        if let Err(err) = self.store.put(&record).await {
            tracing::error!(
                owner = self.owner,
                uid = %record.uid,
                fingerprint = %record.fingerprint,
                %err,
                "action performed but sync state not saved, the next run may repeat it"
            );
            report.failures.push(EventFailure {
                uid: Some(record.uid),
                reason: FailureReason::Unrecorded(err),
            });
        }
    }
}
