//! Application-level configuration loading for the tunables that are not secrets.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ARENA_BACK_CONFIG_PATH";
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Lifetime of issued session tokens.
    pub token_ttl: Duration,
    /// Email that is always granted the admin role at registration, lowercased.
    pub bootstrap_admin_email: Option<String>,
    /// Maximum number of notifications returned by a single listing.
    pub notification_limit: usize,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        token_ttl_secs = app_config.token_ttl.as_secs(),
                        cors_origins = app_config.cors_origins.len(),
                        "loaded configuration file"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Whether `email` (already lowercased) is the configured bootstrap admin.
    pub fn is_bootstrap_admin(&self, email: &str) -> bool {
        self.bootstrap_admin_email.as_deref() == Some(email)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TOKEN_TTL,
            bootstrap_admin_email: None,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
#[serde(default)]
struct RawConfig {
    token_ttl_minutes: Option<u64>,
    bootstrap_admin_email: Option<String>,
    notification_limit: Option<usize>,
    cors_origins: Vec<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            token_ttl: value
                .token_ttl_minutes
                .filter(|minutes| *minutes > 0)
                .map(|minutes| Duration::from_secs(minutes * 60))
                .unwrap_or(defaults.token_ttl),
            bootstrap_admin_email: value
                .bootstrap_admin_email
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),
            notification_limit: value
                .notification_limit
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.notification_limit),
            cors_origins: value.cors_origins,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "bootstrap_admin_email": " Root@Arena.gg " }"#).unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(config.notification_limit, DEFAULT_NOTIFICATION_LIMIT);
        assert!(config.is_bootstrap_admin("root@arena.gg"));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn zero_values_fall_back_to_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "token_ttl_minutes": 0, "notification_limit": 0 }"#)
                .unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(config.notification_limit, DEFAULT_NOTIFICATION_LIMIT);
    }

    #[test]
    fn ttl_is_read_in_minutes() {
        let raw: RawConfig = serde_json::from_str(r#"{ "token_ttl_minutes": 90 }"#).unwrap();
        assert_eq!(AppConfig::from(raw).token_ttl, Duration::from_secs(90 * 60));
    }
}
