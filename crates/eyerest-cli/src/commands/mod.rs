pub mod completions;
pub mod config;
pub mod run;
pub mod status;
pub mod theme;

use chrono::{DateTime, Utc};

/// clap value parser for RFC 3339 timestamps.
pub(crate) fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
