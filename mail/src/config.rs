// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Outgoing mail server used to send invitations.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SmtpConfig {
    /// Server host name, also used for TLS verification.
    pub host: String,
    /// Submission port; STARTTLS is required.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Sender address; the login name when absent.
    #[serde(default)]
    pub from: Option<String>,
}

impl SmtpConfig {
    /// The address invitations are sent from.
    #[must_use]
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

/// Incoming mail server read for invitations.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ImapConfig {
    /// Server host name, also used for TLS verification.
    pub host: String,
    /// Implicit TLS port.
    #[serde(default = "default_imap_port")]
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Mailbox to scan; opened read-only.
    #[serde(default = "default_mailbox")]
    pub mailbox: String,
}

const fn default_smtp_port() -> u16 {
    587
}

const fn default_imap_port() -> u16 {
    993
}

fn default_mailbox() -> String {
    "INBOX".to_string()
}
