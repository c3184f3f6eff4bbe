// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf};

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use tokio::fs;

use crate::config::config_path;

pub const SAMPLE_CONFIG: &str = r#"# calbridge configuration

# Where to remember which events were already handled.
# type is one of "sqlite", "file" (CSV) or "none" (remember nothing).
# The path defaults to $XDG_STATE_HOME/calbridge/calbridge.db.
[store]
type = "sqlite"
# path = "~/.local/state/calbridge/calbridge.db"

# One [[profile]] per user whose calendar and mailbox are kept in sync.
[[profile]]
name = "user1"
event_days = 5     # mail events starting up to this many days ahead
email_hours = 6    # import invitations received in the last this many hours

[profile.caldav]
base_url = "https://caldav.example.com"
calendar_path = "/calendars/user1/personal/"
auth = { type = "digest", username = "user1", password = "change-me" }
# timeout_secs = 30

[profile.smtp]
host = "mail.example.org"
# port = 587
username = "user1@example.org"
password = "change-me"
# from = "User One <user1@example.org>"

[profile.imap]
host = "mail.example.org"
# port = 993
username = "user1@example.org"
password = "change-me"
# mailbox = "INBOX"
"#;

#[derive(Debug, Default, Clone, Copy)]
pub struct CmdInit {
    pub force: bool,
}

impl CmdInit {
    pub const NAME: &str = "init";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Write a sample configuration file")
            .arg(arg!(-f --force "Overwrite an existing configuration file"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            force: matches.get_flag("force"),
        }
    }

    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "writing sample configuration...");
        let path = config_path(config)?;
        self.write(&path).await?;
        println!(
            "{} {}",
            "Sample configuration written to".green(),
            path.display()
        );
        println!("Edit it with your real accounts, then run `calbridge`.");
        Ok(())
    }

    async fn write(self, path: &std::path::Path) -> Result<(), Box<dyn Error>> {
        if path.exists() && !self.force {
            return Err(format!(
                "Config already exists at: {}, use --force to overwrite",
                path.display()
            )
            .into());
        }
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        fs::write(path, SAMPLE_CONFIG).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use calbridge_core::{Config, StoreConfig};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn sample_config_is_valid() {
        let config: Config = SAMPLE_CONFIG.parse().unwrap();
        assert_eq!(config.store, StoreConfig::Sqlite { path: None });
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].name, "user1");
    }

    #[tokio::test]
    async fn writes_sample_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("calbridge").join("config.toml");

        CmdInit::default().write(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);

        std::fs::write(&path, "# edited").unwrap();
        assert!(CmdInit::default().write(&path).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited");

        CmdInit { force: true }.write(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
    }

    #[test]
    fn test_parse_init() {
        let cmd = Command::new("test").subcommand(CmdInit::command());
        let matches = cmd.try_get_matches_from(["test", "init", "--force"]).unwrap();
        let parsed = CmdInit::from(matches.subcommand_matches("init").unwrap());
        assert!(parsed.force);
    }
}
