// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Write};

use calbridge_ical::CalendarEvent;
use imap::Session;
use jiff::{SignedDuration, Timestamp};
use native_tls::TlsConnector;

use crate::config::ImapConfig;
use crate::error::MailError;
use crate::mime::{extract_invites, received_since};

/// Reads invitations from an IMAP mailbox without changing its state.
#[derive(Debug, Clone)]
pub struct ImapReader {
    config: ImapConfig,
}

impl ImapReader {
    /// Creates a reader; each call to [`Self::read_invites`] opens its own session.
    #[must_use]
    pub fn new(config: ImapConfig) -> Self {
        Self { config }
    }

    /// Calendar objects attached to messages dated within the last `window_hours` hours.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting, logging in or fetching fails.
    pub async fn read_invites(&self, window_hours: u32) -> Result<Vec<CalendarEvent>, MailError> {
        let since = Timestamp::now() - SignedDuration::from_hours(i64::from(window_hours));
        let config = self.config.clone();
        let messages = tokio::task::spawn_blocking(move || fetch_messages(&config, since))
            .await
            .map_err(|e| MailError::Task(e.to_string()))??;

        let mut invites = Vec::new();
        for raw in &messages {
            match extract_invites(raw) {
                Ok(events) => invites.extend(events),
                Err(err) => tracing::warn!(%err, "skipping unparsable message"),
            }
        }
        tracing::debug!(
            messages = messages.len(),
            invites = invites.len(),
            "read invitations"
        );
        Ok(invites)
    }
}

/// Runs one session; logs out whether or not fetching succeeded.
fn fetch_messages(config: &ImapConfig, since: Timestamp) -> Result<Vec<Vec<u8>>, MailError> {
    let tls = TlsConnector::builder().build()?;
    let client = imap::connect((config.host.as_str(), config.port), &config.host, &tls)?;
    let mut session = client
        .login(&config.username, &config.password)
        .map_err(|(err, _client)| err)?;

    let result = fetch_since(&mut session, &config.mailbox, since);
    if let Err(err) = session.logout() {
        tracing::warn!(%err, "IMAP logout failed");
    }
    result
}

fn fetch_since<T: Read + Write>(
    session: &mut Session<T>,
    mailbox: &str,
    since: Timestamp,
) -> Result<Vec<Vec<u8>>, MailError> {
    // EXAMINE opens read-only and BODY.PEEK leaves \Seen untouched
    session.examine(mailbox)?;

    let mut ids: Vec<u32> = session.search(search_query(since))?.into_iter().collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    ids.sort_unstable();
    let set = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let fetches = session.fetch(set, "BODY.PEEK[]")?;
    Ok(fetches
        .iter()
        .filter_map(|fetch| fetch.body())
        .filter(|raw| received_since(raw, since.as_second()))
        .map(<[u8]>::to_vec)
        .collect())
}

/// IMAP `SINCE` only has day granularity; exact filtering happens on the `Date` header.
fn search_query(since: Timestamp) -> String {
    format!("SINCE {}", since.strftime("%d-%b-%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_uses_imap_date_format() {
        let since: Timestamp = "2025-01-05T23:30:00Z".parse().unwrap();
        assert_eq!(search_query(since), "SINCE 05-Jan-2025");
    }
}
