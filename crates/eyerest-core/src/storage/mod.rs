mod config;
mod prefs;

pub use config::{Config, NotificationsSection, SessionSection, TickerSection, UiSection};
pub use prefs::{FilePreferences, PreferenceStore, ThemePreference};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Overrides the configuration directory. Used by tests and portable setups.
pub const CONFIG_DIR_ENV: &str = "EYEREST_CONFIG_DIR";

/// Returns `$EYEREST_CONFIG_DIR`, or the platform config dir joined with
/// `eyerest` (`~/.config/eyerest` on Linux). Created if missing.
///
/// # Errors
/// Returns an error if no config directory can be determined or if
/// creating it fails.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("eyerest"),
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
