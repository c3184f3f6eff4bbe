// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use calbridge_ical::CalendarEvent;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::MailError;
use crate::invite::build_invite;

/// Sends invitations through an SMTP submission server.
#[derive(Clone)]
pub struct SmtpSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpSender {
    /// Creates a sender; no connection is made until the first message.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS parameters for `host` cannot be built.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            sender: config.sender().to_string(),
        })
    }

    /// Mails `event` to every attendee awaiting a response and returns how many were addressed.
    ///
    /// An event with no such attendee sends nothing and returns 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or delivery fails.
    pub async fn send_invite(&self, event: &CalendarEvent) -> Result<usize, MailError> {
        let Some(message) = build_invite(event, &self.sender)? else {
            tracing::debug!("no attendee awaiting a response, nothing to send");
            return Ok(0);
        };

        let count = message.envelope().to().len();
        self.transport.send(message).await?;
        tracing::debug!(recipients = count, "invitation delivered");
        Ok(count)
    }
}

impl fmt::Debug for SmtpSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSender")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}
