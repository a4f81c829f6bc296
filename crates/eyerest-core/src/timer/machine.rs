//! Session state machine.
//!
//! The machine is a pure function of its state and the `now` it is
//! handed. It owns no timer; the driver calls `tick(now)` on a coarse
//! cadence.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Working --20m--> OnBreak --20s--> Working --> ...
//!   ^                |                 |
//!   +---- stop / auto-stop ------------+
//! ```
//!
//! Each new phase is anchored at the exact end of the previous one, so
//! the overshoot of the tick that noticed the boundary never accumulates.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::state::{SessionConfig, SessionState, WORK_DURATION};
use crate::clock::{elapsed_between, offset};
use crate::display::Snapshot;
use crate::error::SessionError;
use crate::events::{Event, StopReason};
use crate::notify::{Notice, NotificationPolicy};

/// What a tick (or stop) produced: the event and, when the session's
/// policy allows it, the notice to hand to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub event: Event,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveSession {
    /// Working or OnBreak, never Idle.
    state: SessionState,
    session_started_at: DateTime<Utc>,
    phase_started_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    config: SessionConfig,
}

impl ActiveSession {
    /// `now` as seen by the session: frozen at the pause instant while paused.
    fn effective_now(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.paused_at {
            Some(paused_at) if paused_at < now => paused_at,
            _ => now,
        }
    }

    fn phase_duration(&self) -> Duration {
        self.state.phase_duration().unwrap_or(WORK_DURATION)
    }

    fn phase_remaining(&self, now: DateTime<Utc>) -> Duration {
        let elapsed = elapsed_between(self.phase_started_at, self.effective_now(now));
        self.phase_duration().saturating_sub(elapsed)
    }

    fn session_elapsed(&self, now: DateTime<Utc>) -> Duration {
        elapsed_between(self.session_started_at, self.effective_now(now))
    }
}

/// The one live session, or none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMachine {
    session: Option<ActiveSession>,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(SessionState::Idle)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.paused_at.is_some())
    }

    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|s| s.session_started_at)
    }

    pub fn phase_started_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|s| s.phase_started_at)
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    /// Derived view of the session at `now`. Does not mutate anything.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        match &self.session {
            None => Snapshot::idle(),
            Some(session) => {
                let session_elapsed = session.session_elapsed(now);
                Snapshot {
                    state: session.state,
                    paused: session.paused_at.is_some(),
                    phase_remaining: session.phase_remaining(now),
                    session_elapsed,
                    auto_stop_remaining: session
                        .config
                        .auto_stop_limit()
                        .map(|limit| limit.saturating_sub(session_elapsed)),
                }
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session in the Working phase.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyRunning`] if a session is active.
    /// The running session is not modified.
    pub fn start(&mut self, config: SessionConfig, now: DateTime<Utc>) -> Result<Event, SessionError> {
        if let Some(session) = &self.session {
            return Err(SessionError::AlreadyRunning {
                state: session.state,
            });
        }

        self.session = Some(ActiveSession {
            state: SessionState::Working,
            session_started_at: now,
            phase_started_at: now,
            paused_at: None,
            config,
        });
        info!(auto_stop_after = ?config.auto_stop_limit(), "session started");
        Ok(Event::SessionStarted {
            auto_stop_after_secs: config.auto_stop_limit().map(|d| d.as_secs()),
            at: now,
        })
    }

    /// End the session immediately. No notice is ever raised.
    /// Returns `None` when already idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let session = self.session.take()?;
        let session_elapsed = session.session_elapsed(now);
        info!(elapsed = ?session_elapsed, "session stopped");
        Some(Event::SessionStopped {
            reason: StopReason::Manual,
            session_elapsed_ms: duration_ms(session_elapsed),
            at: now,
        })
    }

    /// Freeze the session. Ticks are ignored until `resume`.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let session = self.session.as_mut()?;
        if session.paused_at.is_some() {
            return None;
        }
        let phase_remaining = session.phase_remaining(now);
        session.paused_at = Some(now.max(session.phase_started_at));
        debug!(state = %session.state, "session paused");
        Some(Event::SessionPaused {
            state: session.state,
            phase_remaining_ms: duration_ms(phase_remaining),
            at: now,
        })
    }

    /// Continue a paused session. Both anchors move forward by the time
    /// spent paused, so the pause counts toward neither the current phase
    /// nor the session cap.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let session = self.session.as_mut()?;
        let paused_at = session.paused_at.take()?;
        let paused_for = elapsed_between(paused_at, now);
        session.phase_started_at = offset(session.phase_started_at, paused_for);
        session.session_started_at = offset(session.session_started_at, paused_for);
        debug!(state = %session.state, paused_for = ?paused_for, "session resumed");
        Some(Event::SessionResumed {
            state: session.state,
            phase_remaining_ms: duration_ms(session.phase_remaining(now)),
            at: now,
        })
    }

    /// Restart the work countdown from `now`. The session start and its
    /// cap are untouched and no notice is raised. A paused session
    /// restarts from the pause instant, so it resumes with a full phase.
    /// Only meaningful while working; a break always runs to its end.
    pub fn restart_work(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let session = self.session.as_mut()?;
        if session.state != SessionState::Working {
            return None;
        }
        session.phase_started_at = session.effective_now(now).max(session.phase_started_at);
        debug!(phase_started_at = %session.phase_started_at, "work countdown restarted");
        Some(Event::WorkRestarted { at: now })
    }

    /// Advance the machine to `now`.
    ///
    /// At most one transition per call. The session cap is checked
    /// before phase completion, so a session never enters a phase it is
    /// not allowed to finish. Calling again with the same `now` yields
    /// nothing new.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Transition> {
        let session = self.session.as_mut()?;
        if session.paused_at.is_some() {
            return None;
        }

        if let Some(limit) = session.config.auto_stop_limit() {
            let session_elapsed = session.session_elapsed(now);
            if session_elapsed >= limit {
                let policy = session.config.notifications;
                self.session = None;
                info!(elapsed = ?session_elapsed, "session auto-stopped");
                let event = Event::SessionStopped {
                    reason: StopReason::AutoStop,
                    session_elapsed_ms: duration_ms(session_elapsed),
                    at: now,
                };
                return Some(Transition::with_policy(event, &policy));
            }
        }

        let duration = session.phase_duration();
        if elapsed_between(session.phase_started_at, now) < duration {
            return None;
        }

        let next = session.state.next_phase()?;
        let boundary = offset(session.phase_started_at, duration);
        let next_duration = next.phase_duration().unwrap_or(WORK_DURATION);
        // A host stalled for longer than the whole next phase: start it
        // now rather than replaying every missed boundary.
        session.phase_started_at = if elapsed_between(boundary, now) >= next_duration {
            now
        } else {
            boundary
        };
        session.state = next;
        debug!(state = %next, phase_started_at = %session.phase_started_at, "phase transition");

        let event = match next {
            SessionState::OnBreak => Event::BreakStarted { at: now },
            _ => Event::WorkResumed { at: now },
        };
        Some(Transition::with_policy(event, &session.config.notifications))
    }

    /// Earliest instant at which `tick` produces a transition: the end of
    /// the current phase or the session cap, whichever comes first.
    /// `None` when idle or paused.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        let session = self.session.as_ref()?;
        if session.paused_at.is_some() {
            return None;
        }
        let phase_end = offset(session.phase_started_at, session.phase_duration());
        let cap = session
            .config
            .auto_stop_limit()
            .map(|limit| offset(session.session_started_at, limit));
        Some(cap.map_or(phase_end, |cap| cap.min(phase_end)))
    }

    /// Apply every transition due up to `now`, each at its own deadline,
    /// as an uninterrupted host would have seen them.
    pub fn catch_up(&mut self, now: DateTime<Utc>) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while let Some(deadline) = self.next_deadline() {
            if deadline > now {
                break;
            }
            match self.tick(deadline) {
                Some(transition) => transitions.push(transition),
                None => break,
            }
        }
        transitions
    }
}

impl Transition {
    fn with_policy(event: Event, policy: &NotificationPolicy) -> Self {
        let notice = event
            .notice_kind()
            .filter(|kind| policy.allows(*kind))
            .map(Notice::for_kind);
        Self { event, notice }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
