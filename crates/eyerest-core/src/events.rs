use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::NoticeKind;
use crate::timer::SessionState;

/// Why a session returned to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Host called `stop()`.
    Manual,
    /// The configured session cap was reached.
    AutoStop,
}

/// Every state change of the session machine produces an Event.
/// The host renders them; the driver maps some of them to notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        auto_stop_after_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    BreakStarted {
        at: DateTime<Utc>,
    },
    WorkResumed {
        at: DateTime<Utc>,
    },
    SessionPaused {
        state: SessionState,
        phase_remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        state: SessionState,
        phase_remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// The work countdown was restarted without ending the session.
    WorkRestarted {
        at: DateTime<Utc>,
    },
    SessionStopped {
        reason: StopReason,
        session_elapsed_ms: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::BreakStarted { at }
            | Event::WorkResumed { at }
            | Event::SessionPaused { at, .. }
            | Event::SessionResumed { at, .. }
            | Event::WorkRestarted { at }
            | Event::SessionStopped { at, .. } => *at,
        }
    }

    /// The kind of user-facing notice this event may raise, before any
    /// policy is applied. Manual stops never raise one.
    pub fn notice_kind(&self) -> Option<NoticeKind> {
        match self {
            Event::BreakStarted { .. } => Some(NoticeKind::BreakStarted),
            Event::WorkResumed { .. } => Some(NoticeKind::WorkResumed),
            Event::SessionStopped {
                reason: StopReason::AutoStop,
                ..
            } => Some(NoticeKind::SessionComplete),
            _ => None,
        }
    }
}
