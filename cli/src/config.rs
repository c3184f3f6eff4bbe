// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use calbridge_core::{Config, StoreConfig};
use tokio::fs;

pub const APP_NAME: &str = "calbridge";

const CALBRIDGE_CONFIG_ENV: &str = "CALBRIDGE_CONFIG";

/// Loads the configuration and resolves the store location.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = config_path(path)?;
    if !path.exists() {
        return Err(format!(
            "No config found at: {}, run `{APP_NAME} init` to create one",
            path.display()
        )
        .into());
    }

    let mut config: Config = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse()?;
    config.store = resolve_store(config.store)?;
    Ok(config)
}

/// The configuration file: `--config`, then `$CALBRIDGE_CONFIG`, then the user config directory.
pub fn config_path(path: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(path) = path {
        expand_path(&path)
    } else if let Ok(env_path) = std::env::var(CALBRIDGE_CONFIG_ENV) {
        expand_path(Path::new(&env_path))
    } else {
        Ok(get_config_dir()?.join(APP_NAME).join("config.toml"))
    }
}

/// Expands the configured store path, or places the store in the user state directory.
fn resolve_store(store: StoreConfig) -> Result<StoreConfig, Box<dyn Error>> {
    if matches!(store, StoreConfig::None) {
        return Ok(store);
    }

    let path = match &store {
        StoreConfig::File { path: Some(path) } | StoreConfig::Sqlite { path: Some(path) } => {
            expand_path(path)?
        }
        StoreConfig::File { path: None } => get_state_dir()?.join(APP_NAME).join("sync.csv"),
        _ => get_state_dir()?.join(APP_NAME).join("calbridge.db"),
    };
    Ok(store.with_path(path))
}

fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle state directories
    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".into())
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_local_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".into())
}

/// Parse a duration string in the format "HH:MM" / "1d" / "24h" / "60m" / "1800s".
pub fn parse_duration(s: &str) -> Result<Duration, Box<dyn Error + Send + Sync>> {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let s = s.trim();
    let secs = if let Some((h, m)) = s.split_once(':') {
        let hours: u64 = h.trim().parse()?;
        let minutes: u64 = m.trim().parse()?;
        hours * HOUR + minutes * MINUTE
    } else if let Some(rest) = s.strip_suffix('d') {
        rest.trim().parse::<u64>()? * DAY
    } else if let Some(rest) = s.strip_suffix('h') {
        rest.trim().parse::<u64>()? * HOUR
    } else if let Some(rest) = s.strip_suffix('m') {
        rest.trim().parse::<u64>()? * MINUTE
    } else if let Some(rest) = s.strip_suffix('s') {
        rest.trim().parse::<u64>()?
    } else {
        return Err(format!("Invalid duration format: {s}").into());
    };

    if secs == 0 {
        return Err("Duration must be positive".into());
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use std::sync::OnceLock;

    use tempfile::TempDir;
    use tokio::sync::Mutex;

    use super::*;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn write_config(dir: &Path, name: &str, profile: &str, store: &str) -> PathBuf {
        let path = dir.join(name);
        let content = format!(
            r#"
{store}

[[profile]]
name = "{profile}"

[profile.caldav]
base_url = "https://caldav.example.com"
calendar_path = "/calendars/{profile}/"

[profile.smtp]
host = "mail.example.org"
username = "{profile}"
password = "secret"

[profile.imap]
host = "mail.example.org"
username = "{profile}"
password = "secret"
"#
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_expand_path_home_env() {
        let home = get_home_dir().unwrap();
        let home_prefixes: &[&str] = if cfg!(unix) {
            &["~", "$HOME", "${HOME}"]
        } else {
            &[r"~", r"%UserProfile%"]
        };
        for prefix in home_prefixes {
            let result = expand_path(&PathBuf::from(format!("{prefix}/Documents"))).unwrap();
            assert_eq!(result, home.join("Documents"));
            assert!(result.is_absolute());
        }
    }

    #[test]
    fn test_expand_path_state() {
        let state_dir = get_state_dir().unwrap();
        let state_prefixes: &[&str] = if cfg!(unix) {
            &["$XDG_STATE_HOME", "${XDG_STATE_HOME}"]
        } else {
            &[r"%LOCALAPPDATA%"]
        };
        for prefix in state_prefixes {
            let result = expand_path(&PathBuf::from(format!("{prefix}/sync.csv"))).unwrap();
            assert_eq!(result, state_dir.join("sync.csv"));
        }
    }

    #[test]
    fn test_expand_path_keeps_others() {
        assert_eq!(
            expand_path(Path::new("/var/lib/calbridge.db")).unwrap(),
            PathBuf::from("/var/lib/calbridge.db")
        );
        assert_eq!(
            expand_path(Path::new("relative/sync.csv")).unwrap(),
            PathBuf::from("relative/sync.csv")
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7_200));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1_800));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("01:15").unwrap(), Duration::from_secs(4_500));
        assert!(parse_duration("0m").is_err());
        assert!(parse_duration("-5m").is_err());
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_resolve_store_defaults_to_state_dir() {
        let state_dir = get_state_dir().unwrap();
        let store = resolve_store(StoreConfig::Sqlite { path: None }).unwrap();
        assert_eq!(
            store.path(),
            Some(state_dir.join("calbridge/calbridge.db").as_path())
        );

        let store = resolve_store(StoreConfig::File { path: None }).unwrap();
        assert_eq!(store.path(), Some(state_dir.join("calbridge/sync.csv").as_path()));

        assert_eq!(resolve_store(StoreConfig::None).unwrap(), StoreConfig::None);
    }

    #[tokio::test]
    async fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let flag_path = write_config(temp_dir.path(), "config.toml", "flag", "");
        let env_path = write_config(temp_dir.path(), "env_config.toml", "env", "");

        let _guard = env_lock().lock().await;
        unsafe {
            std::env::set_var(CALBRIDGE_CONFIG_ENV, env_path.to_str().unwrap());
        }

        let config = parse_config(Some(flag_path)).await.unwrap();
        assert_eq!(config.profiles[0].name, "flag");

        let config = parse_config(None).await.unwrap();
        assert_eq!(config.profiles[0].name, "env");

        unsafe {
            std::env::remove_var(CALBRIDGE_CONFIG_ENV);
        }
    }

    #[tokio::test]
    async fn store_path_is_expanded() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "config.toml",
            "user1",
            "[store]\ntype = \"file\"\npath = \"~/calbridge/sync.csv\"",
        );

        let config = parse_config(Some(path)).await.unwrap();
        let home = get_home_dir().unwrap();
        assert_eq!(
            config.store,
            StoreConfig::File {
                path: Some(home.join("calbridge/sync.csv"))
            }
        );
    }

    #[tokio::test]
    async fn missing_config_suggests_init() {
        let temp_dir = TempDir::new().unwrap();
        let err = parse_config(Some(temp_dir.path().join("absent.toml")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("calbridge init"));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[[profile]]\nname = \"\"\n").unwrap();
        assert!(parse_config(Some(path)).await.is_err());
    }
}
