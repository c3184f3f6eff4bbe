// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf, process::ExitCode};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cmd_init::CmdInit;
use crate::cmd_sync::CmdSync;
use crate::config::{APP_NAME, parse_config};

/// Run the calbridge command-line interface.
pub async fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let result = match Cli::parse() {
        Ok(cli) => cli.run().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Keep a CalDAV calendar and e-mail invitations in sync.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // allow default to sync
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $CALBRIDGE_CONFIG, then \
$XDG_CONFIG_HOME/calbridge/config.toml on Linux and MacOS, \
%LOCALAPPDATA%/calbridge/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdSync::command())
            .subcommand(CmdInit::command())
    }

    /// Parse the command-line arguments
    ///
    /// # Errors
    ///
    /// Never fails; clap exits the process on invalid arguments.
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Ok(Self::from(&matches))
    }

    /// Parse the specified arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Ok(Self::from(&matches))
    }

    /// Create a CLI instance from the `ArgMatches`
    #[must_use]
    pub fn from(matches: &ArgMatches) -> Self {
        use Commands::{Init, Sync};
        let command = match matches.subcommand() {
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdInit::NAME, matches)) => Init(CmdInit::from(matches)),
            _ => Sync(CmdSync::default()),
        };

        let config = matches.get_one("config").cloned();
        Cli { config, command }
    }

    /// Run the command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Synchronize every profile
    Sync(CmdSync),

    /// Write a sample configuration
    Init(CmdInit),
}

impl Commands {
    /// Run the command with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        match self {
            Commands::Sync(a) => {
                tracing::debug!("parsing configuration...");
                let config = parse_config(config).await?;
                a.run(&config).await
            }
            Commands::Init(a) => a.run(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from(vec!["test", "-c", "/tmp/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert!(matches!(cli.command, Commands::Sync(_)));
    }

    #[test]
    fn test_parse_default_sync() {
        let cli = Cli::try_parse_from(vec!["test"]).unwrap();
        match cli.command {
            Commands::Sync(cmd) => {
                assert_eq!(cmd.profile, None);
                assert!(!cmd.dry_run);
                assert_eq!(cmd.interval, None);
            }
            Commands::Init(_) => panic!("Expected Sync command"),
        }
    }

    #[test]
    fn test_parse_sync() {
        let args = vec![
            "test",
            "sync",
            "--profile",
            "user1",
            "--dry-run",
            "--interval",
            "30m",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Sync(cmd) => {
                assert_eq!(cmd.profile.as_deref(), Some("user1"));
                assert!(cmd.dry_run);
                assert_eq!(cmd.interval, Some(Duration::from_secs(30 * 60)));
            }
            Commands::Init(_) => panic!("Expected Sync command"),
        }
    }

    #[test]
    fn test_parse_sync_rejects_bad_interval() {
        assert!(Cli::try_parse_from(vec!["test", "sync", "--interval", "soon"]).is_err());
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(vec!["test", "-c", "/tmp/c.toml", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init(_)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }
}
