// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use calbridge_caldav::CalDavClient;
use calbridge_mail::{ImapReader, SmtpSender};

use crate::config::Profile;
use crate::error::{CollaboratorError, SyncError};
use crate::store::SyncStore;
use crate::sync::{Orchestrator, SyncReport};

/// Results of both flows for one profile.
#[derive(Debug)]
pub struct ProfileReport {
    /// Profile name.
    pub name: String,
    /// Calendar to mail.
    pub outbound: Result<SyncReport, SyncError>,
    /// Mail to calendar.
    pub inbound: Result<SyncReport, SyncError>,
}

impl ProfileReport {
    /// Whether both flows ran and every event was handled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        [&self.outbound, &self.inbound]
            .iter()
            .all(|flow| flow.as_ref().is_ok_and(SyncReport::is_clean))
    }
}

/// Collaborators of one profile.
///
/// Built once and reused across passes, so connection pools and the Digest nonce counts
/// outlive a single pass.
#[derive(Debug, Clone)]
pub struct ProfileClients {
    calendar: CalDavClient,
    sender: SmtpSender,
    reader: ImapReader,
}

impl ProfileClients {
    /// Builds the `CalDAV`, SMTP and IMAP clients of `profile`.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be constructed from the profile.
    pub fn new(profile: &Profile) -> Result<Self, CollaboratorError> {
        Ok(Self {
            calendar: CalDavClient::new(profile.caldav.clone())?,
            sender: SmtpSender::new(&profile.smtp)?,
            reader: ImapReader::new(profile.imap.clone()),
        })
    }
}

/// Runs the outbound and then the inbound flow for `profile`.
///
/// The flows are independent: a failed outbound pass does not prevent the inbound one.
#[tracing::instrument(skip_all, fields(profile = %profile.name, dry_run = dry_run))]
pub async fn sync_profile(
    profile: &Profile,
    clients: &ProfileClients,
    store: &dyn SyncStore,
    dry_run: bool,
) -> ProfileReport {
    let sync = Orchestrator::new(&profile.name, store).dry_run(dry_run);

    let outbound = sync
        .send_invites(&clients.calendar, &clients.sender, profile.event_days)
        .await;
    log_flow(&outbound);
    let inbound = sync
        .import_invites(&clients.reader, &clients.calendar, profile.email_hours)
        .await;
    log_flow(&inbound);

    ProfileReport {
        name: profile.name.clone(),
        outbound,
        inbound,
    }
}

fn log_flow(result: &Result<SyncReport, SyncError>) {
    match result {
        Ok(report) => tracing::info!(
            direction = %report.direction,
            actions = report.actions,
            skipped = report.skipped,
            failures = report.failures.len(),
            "pass finished"
        ),
        Err(err) => tracing::warn!(%err, "pass aborted"),
    }
}
