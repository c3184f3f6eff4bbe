// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, time::Duration};

use calbridge_core::{
    CollaboratorError, Config, Direction, Profile, ProfileClients, ProfileReport, StoreError,
    SyncError, SyncReport, SyncStore, sync_profile,
};
use clap::{ArgMatches, Command, arg};
use colored::Colorize;

use crate::config::parse_duration;

#[derive(Debug, Default, Clone)]
pub struct CmdSync {
    pub profile: Option<String>,
    pub dry_run: bool,
    pub interval: Option<Duration>,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Mail upcoming events as invitations and add received invitations to the calendar")
            .arg(arg!(--profile <NAME> "Only synchronize the named profile").required(false))
            .arg(arg!(--"dry-run" "Log what would be done without sending, writing or recording anything"))
            .arg(
                arg!(--interval <DURATION> "Repeat the pass forever, waiting DURATION in between")
                    .long_help(
                        "\
Repeat the pass forever, waiting DURATION in between. Accepts HH:MM or a number with a \
unit suffix: 1d, 2h, 30m, 90s.",
                    )
                    .required(false)
                    .value_parser(parse_duration),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            profile: matches.get_one::<String>("profile").cloned(),
            dry_run: matches.get_flag("dry-run"),
            interval: matches.get_one::<Duration>("interval").copied(),
        }
    }

    /// Runs the passes; the store is closed however they end.
    ///
    /// Clients are built once so Digest nonce counts carry over between passes.
    pub async fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "synchronizing...");
        let profiles: Vec<_> = self
            .select(config)?
            .into_iter()
            .map(|profile| (profile, ProfileClients::new(profile)))
            .collect();

        let store = config.store.open().await?;
        let result = self.run_with(&profiles, store.as_ref()).await;
        finish(result, store.close().await)
    }

    fn select<'a>(&self, config: &'a Config) -> Result<Vec<&'a Profile>, Box<dyn Error>> {
        match &self.profile {
            Some(name) => match config.profile(name) {
                Some(profile) => Ok(vec![profile]),
                None => Err(format!("No profile named {name}").into()),
            },
            None => Ok(config.profiles.iter().collect()),
        }
    }

    async fn run_with(
        &self,
        profiles: &[(&Profile, Result<ProfileClients, CollaboratorError>)],
        store: &dyn SyncStore,
    ) -> Result<(), Box<dyn Error>> {
        loop {
            let failed = self.pass(profiles, store).await;

            let Some(interval) = self.interval else {
                return match failed {
                    0 => Ok(()),
                    n => Err(format!("{n} of {} profile(s) failed", profiles.len()).into()),
                };
            };

            if failed > 0 {
                tracing::warn!(failed, "some profiles failed, retrying on the next pass");
            }
            tracing::info!(?interval, "waiting for the next pass");
            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted, stopping");
                    return Ok(());
                }
            }
        }
    }

    /// Syncs every profile in turn and returns how many failed.
    async fn pass(
        &self,
        profiles: &[(&Profile, Result<ProfileClients, CollaboratorError>)],
        store: &dyn SyncStore,
    ) -> usize {
        let mut failed = 0;
        for (profile, clients) in profiles {
            match clients {
                Ok(clients) => {
                    let report = sync_profile(profile, clients, store, self.dry_run).await;
                    print_report(&report);
                    if !report.is_success() {
                        failed += 1;
                    }
                }
                Err(e) => {
                    println!("{} {}: {e}", "Error:".red(), profile.name.bold());
                    failed += 1;
                }
            }
        }
        failed
    }
}

/// The pass result, or the close error if the passes succeeded.
fn finish(
    result: Result<(), Box<dyn Error>>,
    closed: Result<(), StoreError>,
) -> Result<(), Box<dyn Error>> {
    match (result, closed) {
        (Ok(()), closed) => closed.map_err(Into::into),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::error!(%close_err, "failed to close the sync store");
            Err(e)
        }
    }
}

fn print_report(report: &ProfileReport) {
    println!("{}", report.name.bold());
    for (label, flow) in [("outbound", &report.outbound), ("inbound", &report.inbound)] {
        let line = format!("{label}: {}", describe(flow));
        match flow {
            Ok(r) if r.is_clean() => println!("  {line}"),
            Ok(r) => {
                println!("  {}", line.yellow());
                for failure in &r.failures {
                    let uid = failure.uid.as_deref().unwrap_or("<unknown>");
                    let note = if failure.reason.duplicate_risk() {
                        " (may be repeated)"
                    } else {
                        ""
                    };
                    println!("    {} {uid}: {}{note}", "-".red(), failure.reason);
                }
            }
            Err(_) => println!("  {}", line.red()),
        }
    }
}

fn describe(flow: &Result<SyncReport, SyncError>) -> String {
    match flow {
        Ok(r) => {
            let verb = match r.direction {
                Direction::Outbound => "sent",
                Direction::Inbound => "applied",
            };
            format!(
                "{} {verb}, {} skipped, {} failed",
                r.actions,
                r.skipped,
                r.failures.len()
            )
        }
        Err(e) => format!("aborted, {e}"),
    }
}

#[cfg(test)]
mod tests {
    use clap::Command;

    use super::*;

    const CONFIG: &str = r#"
[store]
type = "none"

[[profile]]
name = "user1"

[profile.caldav]
base_url = "http://127.0.0.1:1"
calendar_path = "/calendars/user1/"

[profile.smtp]
host = "127.0.0.1"
port = 1
username = "user1"
password = "secret"

[profile.imap]
host = "127.0.0.1"
port = 1
username = "user1"
password = "secret"
"#;

    #[test]
    fn test_parse_sync() {
        let cmd = Command::new("test").subcommand(CmdSync::command());
        let matches = cmd
            .try_get_matches_from(["test", "sync", "--interval", "01:30"])
            .unwrap();
        let sub_matches = matches.subcommand_matches("sync").unwrap();
        let parsed = CmdSync::from(sub_matches);
        assert_eq!(parsed.interval, Some(Duration::from_secs(90 * 60)));
        assert!(!parsed.dry_run);
    }

    #[test]
    fn selects_named_profile() {
        let config: Config = CONFIG.parse().unwrap();
        let all = CmdSync::default();
        assert_eq!(all.select(&config).unwrap().len(), 1);

        let missing = CmdSync {
            profile: Some("nobody".to_string()),
            ..CmdSync::default()
        };
        assert!(missing.select(&config).is_err());
    }

    #[test]
    fn describes_flows() {
        let report = SyncReport {
            direction: Direction::Outbound,
            actions: 2,
            skipped: 3,
            failures: Vec::new(),
        };
        assert_eq!(describe(&Ok(report)), "2 sent, 3 skipped, 0 failed");
        let err = SyncError::Store(calbridge_core::StoreError::Closed);
        assert_eq!(describe(&Err(err)), "aborted, store failed: store is closed");
    }

    #[test]
    fn pass_error_wins_over_close_error() {
        let err = finish(Err("1 of 1 profile(s) failed".into()), Err(StoreError::Closed));
        assert_eq!(err.unwrap_err().to_string(), "1 of 1 profile(s) failed");

        let err = finish(Ok(()), Err(StoreError::Closed));
        assert_eq!(err.unwrap_err().to_string(), "store is closed");

        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[tokio::test]
    async fn failing_profile_fails_the_run() {
        let config: Config = CONFIG.parse().unwrap();
        let result = CmdSync::default().run(&config).await;
        assert!(result.is_err());
    }
}
