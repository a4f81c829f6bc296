use chrono::{DateTime, Utc};
use clap::Args;
use eyerest_core::{Config, SessionMachine};

use super::parse_rfc3339;

#[derive(Args)]
pub struct StatusArgs {
    /// When the session started (RFC 3339)
    #[arg(long, value_parser = parse_rfc3339)]
    pub started_at: DateTime<Utc>,
    /// Session cap in hours; 0 disables. Defaults to the configured value.
    #[arg(long)]
    pub auto_stop: Option<u32>,
    /// Instant to report on (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_rfc3339)]
    pub at: Option<DateTime<Utc>>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = args.at.unwrap_or_else(Utc::now);
    if now < args.started_at {
        return Err(format!("--started-at {} is later than {now}", args.started_at).into());
    }

    let mut session = Config::load()?.session_config();
    if let Some(hours) = args.auto_stop {
        session = session.with_auto_stop_hours(hours);
    }

    let mut machine = SessionMachine::new();
    machine.start(session, args.started_at)?;
    machine.catch_up(now);

    let snapshot = machine.snapshot(now);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
