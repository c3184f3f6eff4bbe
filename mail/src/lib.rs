// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Send calendar invitations over SMTP and read received ones over IMAP.

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

mod config;
mod error;
pub mod invite;
mod mime;
mod reader;
mod sender;

pub use crate::config::{ImapConfig, SmtpConfig};
pub use crate::error::MailError;
pub use crate::mime::{extract_invites, received_since};
pub use crate::reader::ImapReader;
pub use crate::sender::SmtpSender;
