//! Time sources.
//!
//! [`Clock`] answers "what time is it"; [`Ticker`] says "look again now".
//! The session machine only ever sees the timestamps a clock returns, so
//! tests swap in a [`ManualClock`] and feed synthetic instants.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{Interval, MissedTickBehavior};

/// Cadence the driver ticks at unless configured otherwise. Bounds how
/// late a phase boundary can be noticed.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(100);

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(offset(self.now.get(), by));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Repeating tick source.
///
/// The tokio interval is created on the first `tick()`, so a ticker can
/// be built outside a runtime. Late ticks are skipped, never bursted:
/// after a stall the caller sees one tick and reads the clock.
#[derive(Debug)]
pub struct Ticker {
    cadence: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(cadence: Duration) -> Self {
        Self {
            cadence,
            interval: None,
        }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Completes at the next tick. The first call completes immediately.
    pub async fn tick(&mut self) {
        let cadence = self.cadence;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        interval.tick().await;
    }
}

/// Time from `from` to `to`, zero if `to` is earlier.
pub fn elapsed_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
    (to - from).to_std().unwrap_or_default()
}

/// `at + by`, saturating at the latest representable instant.
pub fn offset(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
