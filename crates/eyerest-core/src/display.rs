//! Human-readable views of a session. Pure functions, no clock access.

use std::time::Duration;

use serde::Serialize;

use crate::timer::{SessionState, WORK_DURATION};

/// `mm:ss`, both fields floored. Minutes keep counting past 59.
pub fn format_time(d: Duration) -> String {
    let total_seconds = d.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// `"Xh Ym"` once past the hour, `"Ym"` before. Floored to whole minutes.
pub fn format_session_time(d: Duration) -> String {
    let total_minutes = d.as_secs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Point-in-time view returned by `snapshot(now)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub paused: bool,
    #[serde(rename = "phase_remaining_ms", serialize_with = "millis::serialize")]
    pub phase_remaining: Duration,
    #[serde(rename = "session_elapsed_ms", serialize_with = "millis::serialize")]
    pub session_elapsed: Duration,
    #[serde(rename = "auto_stop_remaining_ms", serialize_with = "millis::serialize_opt")]
    pub auto_stop_remaining: Option<Duration>,
}

impl Snapshot {
    /// What an idle timer shows: a full work phase, nothing elapsed.
    pub fn idle() -> Self {
        Self {
            state: SessionState::Idle,
            paused: false,
            phase_remaining: WORK_DURATION,
            session_elapsed: Duration::ZERO,
            auto_stop_remaining: None,
        }
    }

    pub fn phase_remaining_text(&self) -> String {
        format_time(self.phase_remaining)
    }

    pub fn session_elapsed_text(&self) -> String {
        format_session_time(self.session_elapsed)
    }

    /// One-line summary, e.g. `Working 19:58 | session 0m | auto-stop in 1h 59m`.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{} {} | session {}",
            self.state,
            self.phase_remaining_text(),
            self.session_elapsed_text()
        );
        if let Some(remaining) = self.auto_stop_remaining {
            line.push_str(" | auto-stop in ");
            line.push_str(&format_session_time(remaining));
        }
        if self.paused {
            line.push_str(" (paused)");
        }
        line
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    fn as_ms(d: &Duration) -> u64 {
        u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(as_ms(d))
    }

    pub fn serialize_opt<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&as_ms(d)),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn format_time_examples() {
        assert_eq!(format_time(Duration::from_millis(125_000)), "02:05");
        assert_eq!(format_time(Duration::ZERO), "00:00");
        assert_eq!(format_time(WORK_DURATION), "20:00");
        assert_eq!(format_time(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_time(Duration::from_secs(125 * 60)), "125:00");
    }

    #[test]
    fn format_session_time_examples() {
        assert_eq!(format_session_time(Duration::from_millis(5_400_000)), "1h 30m");
        assert_eq!(format_session_time(Duration::from_millis(120_000)), "2m");
        assert_eq!(format_session_time(Duration::from_millis(119_999)), "1m");
        assert_eq!(format_session_time(Duration::from_secs(3600)), "1h 0m");
        assert_eq!(format_session_time(Duration::ZERO), "0m");
    }

    #[test]
    fn idle_status_line() {
        assert_eq!(Snapshot::idle().status_line(), "Idle 20:00 | session 0m");
    }

    #[test]
    fn capped_paused_status_line() {
        let snap = Snapshot {
            state: SessionState::OnBreak,
            paused: true,
            phase_remaining: Duration::from_millis(12_400),
            session_elapsed: Duration::from_secs(61 * 60),
            auto_stop_remaining: Some(Duration::from_secs(59 * 60)),
        };
        assert_eq!(
            snap.status_line(),
            "On break 00:12 | session 1h 1m | auto-stop in 59m (paused)"
        );
    }

    #[test]
    fn snapshot_serializes_millis() {
        let json = serde_json::to_value(Snapshot::idle()).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["phase_remaining_ms"], 1_200_000);
        assert_eq!(json["session_elapsed_ms"], 0);
        assert!(json["auto_stop_remaining_ms"].is_null());
    }

    proptest! {
        #[test]
        fn format_time_floors_to_seconds(ms in 0u64..(100 * 60 * 60 * 1000)) {
            let text = format_time(Duration::from_millis(ms));
            let (mm, ss) = text.split_once(':').unwrap();
            prop_assert!(mm.len() >= 2);
            prop_assert_eq!(ss.len(), 2);
            let mm: u64 = mm.parse().unwrap();
            let ss: u64 = ss.parse().unwrap();
            prop_assert!(ss < 60);
            prop_assert_eq!(mm * 60 + ss, ms / 1000);
        }

        #[test]
        fn format_session_time_floors_to_minutes(ms in 0u64..(100 * 60 * 60 * 1000)) {
            let text = format_session_time(Duration::from_millis(ms));
            let total_minutes = ms / 60_000;
            let parsed = match text.split_once("h ") {
                Some((h, m)) => {
                    let h: u64 = h.parse().unwrap();
                    prop_assert!(h > 0);
                    h * 60 + m.trim_end_matches('m').parse::<u64>().unwrap()
                }
                None => text.trim_end_matches('m').parse::<u64>().unwrap(),
            };
            prop_assert_eq!(parsed, total_minutes);
            prop_assert_eq!(text.contains('h'), total_minutes >= 60);
        }

        #[test]
        fn format_time_is_monotonic(a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let to_secs = |t: String| {
                let (mm, ss) = t.split_once(':').unwrap();
                mm.parse::<u64>().unwrap() * 60 + ss.parse::<u64>().unwrap()
            };
            prop_assert!(
                to_secs(format_time(Duration::from_millis(lo)))
                    <= to_secs(format_time(Duration::from_millis(hi)))
            );
        }
    }
}
