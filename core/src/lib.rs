// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Synchronization core of calbridge: event fingerprints, the sync-state store and the
//! orchestrator that mails calendar events out and writes received invitations back.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]

mod bridge;
mod config;
mod error;
mod fingerprint;
mod record;
pub mod service;
pub mod store;
mod sync;

pub use crate::bridge::{ProfileClients, ProfileReport, sync_profile};
pub use crate::config::{Config, ConfigError, Profile};
pub use crate::error::{CollaboratorError, FingerprintError, StoreError, SyncError};
pub use crate::fingerprint::{EventIdentity, fingerprint, identify};
pub use crate::record::{Direction, SyncRecord};
pub use crate::service::{CalendarService, InviteReader, InviteSender, TimeWindow};
pub use crate::store::{FileStore, NoopStore, SqliteStore, StoreConfig, SyncStore};
pub use crate::sync::{EventFailure, FailureReason, Orchestrator, SyncReport};
