//! Core error types for eyerest-core.
//!
//! Only `SessionError` and `ConfigError` ever reach a caller as control
//! flow; hosts box them at their own boundary. `NotificationDeliveryError`
//! is produced by notifier adapters and swallowed (logged) by the driver.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::SessionState;

/// Errors from the session control surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `start` was called while a session is already active.
    /// The running session is left untouched.
    #[error("A session is already running (state: {state})")]
    AlreadyRunning { state: SessionState },
}

/// A notifier failed to hand the notice to the platform.
///
/// Never fatal: the transition that produced the notice has already
/// been applied when this is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to deliver notification: {message}")]
pub struct NotificationDeliveryError {
    pub message: String,
}

impl NotificationDeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No usable configuration directory
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Failed to read or write the configuration file
    #[error("Configuration I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Key does not exist in the configuration tree
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
