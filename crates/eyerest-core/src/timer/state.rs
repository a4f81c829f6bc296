use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notify::NotificationPolicy;

/// Length of a work phase.
pub const WORK_DURATION: Duration = Duration::from_secs(20 * 60);
/// Length of a break phase.
pub const BREAK_DURATION: Duration = Duration::from_secs(20);

const SECS_PER_HOUR: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Working,
    OnBreak,
}

impl SessionState {
    /// Fixed length of the phase, `None` when idle.
    pub fn phase_duration(self) -> Option<Duration> {
        match self {
            SessionState::Idle => None,
            SessionState::Working => Some(WORK_DURATION),
            SessionState::OnBreak => Some(BREAK_DURATION),
        }
    }

    pub fn is_active(self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Phase that follows this one. Idle has no successor.
    pub(crate) fn next_phase(self) -> Option<SessionState> {
        match self {
            SessionState::Idle => None,
            SessionState::Working => Some(SessionState::OnBreak),
            SessionState::OnBreak => Some(SessionState::Working),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Working => "Working",
            SessionState::OnBreak => "On break",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settings chosen at session start. Never changes while the session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cap on total session length. `None` or zero means unlimited.
    #[serde(default)]
    pub auto_stop_after: Option<Duration>,
    #[serde(default)]
    pub notifications: NotificationPolicy,
}

impl SessionConfig {
    /// Cap the session at a whole number of hours; `0` means unlimited.
    ///
    /// The CLI offers 0, 1, 2, 4, 6, 8 and 10, but any value is accepted.
    pub fn with_auto_stop_hours(mut self, hours: u32) -> Self {
        self.auto_stop_after =
            (hours > 0).then(|| Duration::from_secs(u64::from(hours) * SECS_PER_HOUR));
        self
    }

    pub fn with_notifications(mut self, policy: NotificationPolicy) -> Self {
        self.notifications = policy;
        self
    }

    /// The effective cap, with zero folded into "unlimited".
    pub fn auto_stop_limit(&self) -> Option<Duration> {
        self.auto_stop_after.filter(|limit| !limit.is_zero())
    }
}
