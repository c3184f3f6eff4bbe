// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::str::FromStr;

use calbridge_caldav::CalDavConfig;
use calbridge_mail::{ImapConfig, SmtpConfig};
use serde::Deserialize;

use crate::store::StoreConfig;

/// Default outbound lookahead in days.
pub const DEFAULT_EVENT_DAYS: u32 = 5;

/// Default inbound lookback in hours.
pub const DEFAULT_EMAIL_HOURS: u32 = 6;

/// Configuration of the whole bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where sync state is kept.
    #[serde(default)]
    pub store: StoreConfig,

    /// One entry per managed user, written as `[[profile]]`.
    #[serde(default, rename = "profile")]
    pub profiles: Vec<Profile>,
}

/// Accounts and windows of one managed user.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Unique name; also the owner of the user's sync records.
    pub name: String,

    /// Days ahead to look for calendar events to mail.
    #[serde(default = "default_event_days")]
    pub event_days: u32,

    /// Hours back to look for received invitations.
    #[serde(default = "default_email_hours")]
    pub email_hours: u32,

    /// Calendar server.
    pub caldav: CalDavConfig,

    /// Outgoing mail server.
    pub smtp: SmtpConfig,

    /// Incoming mail server.
    pub imap: ImapConfig,
}

fn default_event_days() -> u32 {
    DEFAULT_EVENT_DAYS
}

fn default_email_hours() -> u32 {
    DEFAULT_EMAIL_HOURS
}

/// Why a configuration was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Not valid TOML or missing required keys.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// No `[[profile]]` entry.
    #[error("no profile configured")]
    NoProfiles,

    /// A profile has an empty name.
    #[error("profile #{0} has an empty name")]
    EmptyName(usize),

    /// Two profiles share a name.
    #[error("duplicate profile name: {0}")]
    DuplicateName(String),
}

impl Config {
    /// Checks the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no profile, or profile names are empty or repeated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let mut seen = HashSet::new();
        for (i, profile) in self.profiles.iter().enumerate() {
            let name = profile.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyName(i + 1));
            }
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
        }
        Ok(())
    }

    /// The profile called `name`.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    #[tracing::instrument(skip_all)]
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(src)?;
        config.validate()?;
        tracing::debug!(profiles = config.profiles.len(), store = ?config.store, "parsed configuration");
        Ok(config)
    }
}
