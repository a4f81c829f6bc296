//! Integration tests for a full reminder session.
//!
//! Drives the public API the way a host does: configuration from a TOML
//! file, a driver on a manual clock, and a recording notifier.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use eyerest_core::{
    Config, Event, ManualClock, NoticeKind, RecordingNotifier, SessionDriver, SessionState,
    StopReason, BREAK_DURATION, WORK_DURATION,
};

#[test]
fn test_full_session_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[session]\nauto_stop_after_hours = 1\n\n[notifications]\non_work_resume = true\n",
    )
    .unwrap();
    let config = Config::load_from(&path).unwrap();

    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap());
    let mut driver = SessionDriver::with_clock(RecordingNotifier::new(), clock.clone())
        .with_cadence(config.cadence());
    driver.start(config.session_config()).unwrap();

    // The cap at 60:00 lands before the third break at 60:40.
    let mut events = Vec::new();
    let step = Duration::from_millis(250);
    while driver.machine().is_active() {
        clock.advance(step);
        if let Some(transition) = driver.on_tick() {
            events.push(transition.event);
        }
    }

    let breaks = events
        .iter()
        .filter(|e| matches!(e, Event::BreakStarted { .. }))
        .count();
    assert_eq!(breaks, 2);
    assert!(matches!(
        events.last(),
        Some(Event::SessionStopped {
            reason: StopReason::AutoStop,
            ..
        })
    ));
    assert_eq!(
        driver.notifier().kinds(),
        vec![
            NoticeKind::BreakStarted,
            NoticeKind::WorkResumed,
            NoticeKind::BreakStarted,
            NoticeKind::WorkResumed,
            NoticeKind::SessionComplete,
        ]
    );
    assert!(!driver.has_ticker());
    assert_eq!(driver.snapshot().state, SessionState::Idle);
}

#[test]
fn test_pause_moves_break_schedule() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap());
    let mut driver = SessionDriver::with_clock(RecordingNotifier::new(), clock.clone());
    driver.start(Config::default().session_config()).unwrap();

    clock.advance(Duration::from_secs(10 * 60));
    driver.pause().unwrap();
    clock.advance(Duration::from_secs(5 * 60));
    assert!(driver.on_tick().is_none());
    assert!(driver.snapshot().paused);
    driver.resume().unwrap();

    // Ten minutes of work remain after the pause.
    clock.advance(Duration::from_secs(10 * 60) - Duration::from_millis(1));
    assert!(driver.on_tick().is_none());
    clock.advance(Duration::from_millis(1));
    assert!(driver.on_tick().is_some());
    assert_eq!(driver.machine().state(), SessionState::OnBreak);

    let snap = driver.snapshot();
    assert_eq!(snap.phase_remaining, BREAK_DURATION);
    assert_eq!(snap.session_elapsed, WORK_DURATION);
    assert_eq!(snap.status_line(), "On break 00:20 | session 20m");
}

#[test]
fn test_silenced_config_never_notifies() {
    let mut config = Config::default();
    config.set("notifications.enabled", "false").unwrap();
    config.set("session.auto_stop_after_hours", "1").unwrap();

    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap());
    let mut driver = SessionDriver::with_clock(RecordingNotifier::new(), clock.clone());
    driver.start(config.session_config()).unwrap();

    for _ in 0..4 * 60 {
        clock.advance(Duration::from_secs(15));
        driver.on_tick();
    }

    assert!(!driver.machine().is_active());
    assert!(driver.notifier().received.is_empty());
    assert_eq!(driver.stats().shown, 0);
}
