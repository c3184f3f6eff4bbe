// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use calbridge_caldav::CalDavError;
use calbridge_ical::EventError;
use calbridge_mail::MailError;

/// Why an event could not be fingerprinted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    /// The calendar object does not hold exactly one event with exactly one UID.
    #[error("expected one VEVENT with one UID, found {events} event(s) and {uids} UID(s)")]
    Identity {
        /// Number of `VEVENT` components.
        events: usize,
        /// Number of `UID` properties across them.
        uids: usize,
    },

    /// The event lacks a usable start or end time.
    #[error("incomplete event: {0}")]
    IncompleteEvent(#[source] EventError),
}

/// Infrastructure failures of a sync-state store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database rejected an operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The embedded schema migration failed.
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The flat file could not be read or written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value decoded but does not belong to its key.
    #[error("corrupt record under {key}: {reason}")]
    Corrupt {
        /// Key the value was stored under.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The store has been closed.
    #[error("store is closed")]
    Closed,
}

/// A calendar or mail collaborator failed.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The `CalDAV` server request failed.
    #[error("calendar: {0}")]
    Calendar(#[from] CalDavError),

    /// Sending or reading mail failed.
    #[error("mail: {0}")]
    Mail(#[from] MailError),
}

/// A failure that aborts a whole sync flow.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Listing events or reading the mailbox failed.
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// The store can no longer be used.
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}
