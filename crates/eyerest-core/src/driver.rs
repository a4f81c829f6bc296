//! Session driver: the event loop around [`SessionMachine`].
//!
//! The driver owns the machine, the notifier and the only ticker. Each
//! tick samples the clock, advances the machine and forwards any notice.
//! Host commands arrive on a channel and are applied between ticks, so
//! the machine is never touched by two handlers at once.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock, Ticker, DEFAULT_CADENCE};
use crate::display::Snapshot;
use crate::error::SessionError;
use crate::events::{Event, StopReason};
use crate::notify::{Notice, Notifier, PermissionProbe};
use crate::timer::{SessionConfig, SessionMachine, Transition};

/// Commands a host can send to a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Stop,
    Pause,
    Resume,
    /// Restart the current work countdown.
    RestartWork,
}

/// Outcome counters for notices handed to the notifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    pub shown: u32,
    pub unsupported: u32,
    pub failed: u32,
}

enum LoopStep {
    Tick,
    Control(Control),
    ControlsClosed,
    Shutdown,
}

pub struct SessionDriver<N, C = SystemClock> {
    machine: SessionMachine,
    notifier: N,
    clock: C,
    cadence: Duration,
    ticker: Option<Ticker>,
    notifications_supported: bool,
    stats: DeliveryStats,
    last_stop: Option<StopReason>,
}

impl<N: Notifier + PermissionProbe> SessionDriver<N, SystemClock> {
    pub fn new(notifier: N) -> Self {
        Self::with_clock(notifier, SystemClock)
    }
}

impl<N: Notifier + PermissionProbe, C: Clock> SessionDriver<N, C> {
    pub fn with_clock(notifier: N, clock: C) -> Self {
        Self {
            machine: SessionMachine::new(),
            notifier,
            clock,
            cadence: DEFAULT_CADENCE,
            ticker: None,
            notifications_supported: false,
            stats: DeliveryStats::default(),
            last_stop: None,
        }
    }

    /// Tick cadence for sessions started after this call.
    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn stats(&self) -> DeliveryStats {
        self.stats
    }

    /// Whether a tick registration is outstanding.
    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn notifications_supported(&self) -> bool {
        self.notifications_supported
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot(self.clock.now())
    }

    /// Start a session and arm the ticker.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyRunning`] if a session is active;
    /// the running session and its ticker are left as they were.
    pub fn start(&mut self, config: SessionConfig) -> Result<Event, SessionError> {
        let event = self.machine.start(config, self.clock.now())?;

        self.notifications_supported = self.notifier.notifications_supported();
        if !self.notifications_supported {
            warn!("notifications are not supported in this environment; reminders will be silent");
        }

        self.ticker = Some(Ticker::new(self.cadence));
        self.last_stop = None;
        Ok(event)
    }

    /// Stop the session. The ticker is dropped before this returns, so no
    /// further tick is processed.
    pub fn stop(&mut self) -> Option<Event> {
        self.ticker = None;
        let event = self.machine.stop(self.clock.now())?;
        self.last_stop = Some(StopReason::Manual);
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.machine.pause(self.clock.now())
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.machine.resume(self.clock.now())
    }

    pub fn restart_work(&mut self) -> Option<Event> {
        self.machine.restart_work(self.clock.now())
    }

    /// Handle one tick: advance the machine and deliver its notice.
    pub fn on_tick(&mut self) -> Option<Transition> {
        let transition = self.machine.tick(self.clock.now())?;
        debug!(event = ?transition.event, "tick produced transition");

        if !self.machine.is_active() {
            self.ticker = None;
            self.last_stop = Some(StopReason::AutoStop);
        }
        if let Some(notice) = &transition.notice {
            self.deliver(notice);
        }
        Some(transition)
    }

    fn deliver(&mut self, notice: &Notice) {
        match self.notifier.notify(notice) {
            Ok(true) => {
                self.stats.shown += 1;
                debug!(kind = ?notice.kind, "notification shown");
            }
            Ok(false) => {
                self.stats.unsupported += 1;
                if self.notifications_supported {
                    warn!(kind = ?notice.kind, "notification was not shown");
                }
            }
            Err(err) => {
                self.stats.failed += 1;
                warn!(kind = ?notice.kind, error = %err, "notification delivery failed");
            }
        }
    }

    /// Drive the active session until it ends.
    ///
    /// Ends on auto-stop, [`Control::Stop`], or when `shutdown` completes
    /// (treated as a manual stop). A closed control channel only disables
    /// commands. `observer` is called after every tick and command with
    /// the fresh snapshot and, for ticks, the transition if any.
    ///
    /// Returns why the session ended, or `None` if none was running.
    pub async fn run<F, O>(
        &mut self,
        mut controls: mpsc::Receiver<Control>,
        shutdown: F,
        mut observer: O,
    ) -> Option<StopReason>
    where
        F: Future<Output = ()>,
        O: FnMut(&Snapshot, Option<&Transition>),
    {
        tokio::pin!(shutdown);
        let mut controls_open = true;

        loop {
            let step = {
                let Some(ticker) = self.ticker.as_mut() else {
                    break;
                };
                tokio::select! {
                    biased;
                    _ = &mut shutdown => LoopStep::Shutdown,
                    command = controls.recv(), if controls_open => match command {
                        Some(command) => LoopStep::Control(command),
                        None => LoopStep::ControlsClosed,
                    },
                    _ = ticker.tick() => LoopStep::Tick,
                }
            };

            match step {
                LoopStep::Tick => {
                    let transition = self.on_tick();
                    observer(&self.snapshot(), transition.as_ref());
                }
                LoopStep::Control(Control::Pause) => {
                    self.pause();
                    observer(&self.snapshot(), None);
                }
                LoopStep::Control(Control::Resume) => {
                    self.resume();
                    observer(&self.snapshot(), None);
                }
                LoopStep::Control(Control::RestartWork) => {
                    self.restart_work();
                    observer(&self.snapshot(), None);
                }
                LoopStep::Control(Control::Stop) => {
                    self.stop();
                }
                LoopStep::Shutdown => {
                    info!("shutdown requested");
                    self.stop();
                }
                LoopStep::ControlsClosed => {
                    debug!("control channel closed");
                    controls_open = false;
                }
            }
        }

        self.last_stop
    }
}
