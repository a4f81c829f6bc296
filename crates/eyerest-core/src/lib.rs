//! # eyerest Core Library
//!
//! Core logic for the eyerest 20-20-20 reminder: every 20 minutes of work,
//! look 20 feet away for 20 seconds. The CLI binary is a thin host over
//! this crate.
//!
//! ## Architecture
//!
//! - **Session machine**: a wall-clock state machine; the caller invokes
//!   `tick(now)` on a coarse cadence and receives transitions plus the
//!   notice (if any) each one should raise
//! - **Driver**: owns the machine, the single ticker and the notifier port
//! - **Storage**: TOML configuration and the theme preference store
//!
//! ## Key Components
//!
//! - [`SessionMachine`]: work/break state machine
//! - [`SessionDriver`]: event loop and notification forwarding
//! - [`Notifier`] / [`PermissionProbe`]: ports implemented by hosts
//! - [`Config`]: application configuration management

pub mod clock;
pub mod display;
pub mod driver;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock, Ticker, DEFAULT_CADENCE};
pub use display::{format_session_time, format_time, Snapshot};
pub use driver::{Control, DeliveryStats, SessionDriver};
pub use error::{ConfigError, NotificationDeliveryError, SessionError};
pub use events::{Event, StopReason};
pub use notify::{Notice, NoticeKind, NotificationPolicy, Notifier, PermissionProbe};
#[cfg(any(test, feature = "test-util"))]
pub use notify::RecordingNotifier;
pub use storage::{Config, FilePreferences, PreferenceStore, ThemePreference};
pub use timer::{SessionConfig, SessionMachine, SessionState, Transition, BREAK_DURATION, WORK_DURATION};
