//! Display preferences. Nothing here influences timing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::Config;
use crate::error::ConfigError;

/// Light/dark choice. `System` defers to whatever the host detects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::System => "system",
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(ThemePreference::System),
            "dark" => Ok(ThemePreference::Dark),
            "light" => Ok(ThemePreference::Light),
            other => Err(ConfigError::InvalidValue {
                key: "ui.theme".into(),
                message: format!("expected system, dark or light, got '{other}'"),
            }),
        }
    }
}

/// Read/write access to persisted preferences.
pub trait PreferenceStore {
    fn theme(&self) -> ThemePreference;
    fn set_theme(&mut self, theme: ThemePreference) -> Result<(), ConfigError>;
}

/// Preferences kept in the config file.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    config: Config,
}

impl FilePreferences {
    /// Open the default config file.
    pub fn open() -> Result<Self, ConfigError> {
        Self::open_at(Config::path()?)
    }

    pub fn open_at(path: PathBuf) -> Result<Self, ConfigError> {
        let config = Config::load_from(&path)?;
        Ok(Self { path, config })
    }
}

impl PreferenceStore for FilePreferences {
    fn theme(&self) -> ThemePreference {
        self.config.ui.theme
    }

    /// Re-reads the file first so other settings written meanwhile survive.
    fn set_theme(&mut self, theme: ThemePreference) -> Result<(), ConfigError> {
        let mut config = Config::load_from(&self.path)?;
        config.ui.theme = theme;
        config.save_to(&self.path)?;
        self.config = config;
        Ok(())
    }
}
