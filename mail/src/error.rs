// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while sending or reading invitations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A sender or recipient address is not a valid mailbox.
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Invalid message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The attachment content type could not be built.
    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    /// SMTP connection or delivery failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// IMAP connection, login or command failed.
    #[error("IMAP error: {0}")]
    Imap(#[from] imap::error::Error),

    /// TLS setup failed.
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// A message could not be parsed as MIME.
    #[error("MIME parsing error: {0}")]
    Parse(#[from] mailparse::MailParseError),

    /// The blocking IMAP task did not finish.
    #[error("IMAP task failed: {0}")]
    Task(String),
}
