//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default session cap (auto-stop hours)
//! - Which transitions raise a notification
//! - Tick cadence
//! - Theme preference for hosts that render one
//!
//! Configuration is stored at `<config_dir>/config.toml`, see
//! [`super::config_dir`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::config_dir;
use super::prefs::ThemePreference;
use crate::error::ConfigError;
use crate::notify::NotificationPolicy;
use crate::timer::SessionConfig;

const MIN_CADENCE_MS: u64 = 10;
const MAX_CADENCE_MS: u64 = 1_000;

/// Session defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSection {
    /// Hours before a session stops by itself. 0 means never.
    #[serde(default)]
    pub auto_stop_after_hours: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsSection {
    /// Master switch. When false no notice is raised at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Use desktop notifications; otherwise notices are printed.
    #[serde(default = "default_true")]
    pub desktop: bool,
    #[serde(flatten)]
    pub policy: NotificationPolicy,
}

/// Tick source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSection {
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
}

/// UI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSection {
    #[serde(default)]
    pub theme: ThemePreference,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<config_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub notifications: NotificationsSection,
    #[serde(default)]
    pub ticker: TickerSection,
    #[serde(default)]
    pub ui: UiSection,
}

fn default_true() -> bool {
    true
}
fn default_cadence_ms() -> u64 {
    100
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            desktop: true,
            policy: NotificationPolicy::default(),
        }
    }
}

impl Default for TickerSection {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("is a section, not a value".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        Ok(())
    }

    /// Policy in effect, with the master switch applied.
    pub fn notification_policy(&self) -> NotificationPolicy {
        if self.notifications.enabled {
            self.notifications.policy
        } else {
            NotificationPolicy::silent()
        }
    }

    /// Session settings for a new session built from these defaults.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_auto_stop_hours(self.session.auto_stop_after_hours)
            .with_notifications(self.notification_policy())
    }

    /// Tick cadence, clamped to 10ms..=1s.
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.ticker.cadence_ms.clamp(MIN_CADENCE_MS, MAX_CADENCE_MS))
    }
}
