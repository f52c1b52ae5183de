//! Application configuration.
//!
//! Settings come from a TOML file; credentials come only from the environment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use sentinel_exchange::{Credentials, ExchangeConfig};
use sentinel_health::HealthConfig;
use sentinel_notify::NotifyConfig;
use sentinel_tracker::TrackerConfig;

use crate::error::{AppError, AppResult};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SL_SENTINEL_CONFIG";
/// Config file used when neither `--config` nor [`CONFIG_ENV`] is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";
pub const PUSH_TOKEN_ENV: &str = "PUSHBULLET_TOKEN";

/// Polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Pause after each cycle completes (seconds).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info,sentinel=debug"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Resolve the config path: explicit > [`CONFIG_ENV`] > [`DEFAULT_CONFIG_PATH`].
    pub fn resolve_path(explicit: Option<String>) -> String {
        explicit
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from `path`, or defaults when the file does not exist.
    ///
    /// Returns whether the file was found.
    pub fn load(path: &str) -> AppResult<(Self, bool)> {
        if Path::new(path).exists() {
            Ok((Self::from_file(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.tracker.validate()?;
        if self.scheduler.interval_secs == 0 {
            return Err(AppError::Config(
                "scheduler.interval_secs must be positive".to_string(),
            ));
        }
        if self.exchange.timeout_secs == 0 || self.notify.timeout_secs == 0 {
            return Err(AppError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Credentials read from the environment at startup.
pub struct Secrets {
    pub exchange: Credentials,
    /// Absent in dry-run mode.
    pub push_token: Option<Zeroizing<String>>,
}

impl Secrets {
    pub fn from_env(dry_run: bool) -> AppResult<Self> {
        Self::from_lookup(dry_run, |name| std::env::var(name).ok())
    }

    /// Read secrets through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(dry_run: bool, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| -> Option<Zeroizing<String>> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(Zeroizing::new)
        };

        let api_key = get(API_KEY_ENV).ok_or(AppError::MissingCredential(API_KEY_ENV))?;
        let api_secret = get(API_SECRET_ENV).ok_or(AppError::MissingCredential(API_SECRET_ENV))?;

        let push_token = match get(PUSH_TOKEN_ENV) {
            Some(token) => Some(token),
            None if dry_run => None,
            None => return Err(AppError::MissingCredential(PUSH_TOKEN_ENV)),
        };

        Ok(Self {
            exchange: Credentials::new(api_key.as_str(), api_secret.as_str()),
            push_token,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("exchange", &self.exchange)
            .field("push_token", &self.push_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
