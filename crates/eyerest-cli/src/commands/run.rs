use std::io::Write;

use clap::Args;
use eyerest_core::{
    format_session_time, Config, Control, Event, SessionDriver, Snapshot, StopReason, Transition,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::notifier::HostNotifier;

#[derive(Args)]
pub struct RunArgs {
    /// Stop after this many hours (0, 1, 2, 4, 6, 8, 10; 0 = never).
    /// Defaults to session.auto_stop_after_hours.
    #[arg(long, value_name = "HOURS")]
    pub auto_stop: Option<u32>,
    /// Also notify when a break ends
    #[arg(long)]
    pub notify_resume: bool,
    /// Do not notify when the session cap is reached
    #[arg(long)]
    pub no_auto_stop_notice: bool,
    /// Print reminders instead of using desktop notifications
    #[arg(long)]
    pub console: bool,
    /// Tick cadence in milliseconds (10..=1000)
    #[arg(long, value_name = "MS")]
    pub cadence_ms: Option<u64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(hours) = args.auto_stop {
        config.session.auto_stop_after_hours = hours;
    }
    if args.notify_resume {
        config.notifications.policy.on_work_resume = true;
    }
    if args.no_auto_stop_notice {
        config.notifications.policy.on_auto_stop = false;
    }
    if let Some(ms) = args.cadence_ms {
        config.ticker.cadence_ms = ms;
    }

    let notifier = HostNotifier::select(config.notifications.desktop && !args.console);
    info!(notifier = notifier.name(), "notifier selected");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(config, notifier));
    // The stdin reader may still be parked on a blocking read.
    runtime.shutdown_background();
    result
}

async fn drive(config: Config, notifier: HostNotifier) -> Result<(), Box<dyn std::error::Error>> {
    let mut driver = SessionDriver::new(notifier).with_cadence(config.cadence());
    let started = driver.start(config.session_config())?;
    if let Event::SessionStarted {
        auto_stop_after_secs: Some(secs),
        ..
    } = started
    {
        emit(&format!(
            "eyerest running, stops after {}",
            format_session_time(std::time::Duration::from_secs(secs))
        ));
    } else {
        emit("eyerest running");
    }
    emit("commands: p = pause, r = resume, reset = restart work countdown, s = stop (ctrl-c also stops)");

    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(read_commands(tx));

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    let mut last = driver.snapshot();
    let reason = driver
        .run(rx, shutdown, |snapshot, transition| {
            render(snapshot, transition);
            if snapshot.state.is_active() {
                last = *snapshot;
            }
        })
        .await;

    emit("");
    let elapsed = format_session_time(last.session_elapsed);
    match reason {
        Some(StopReason::AutoStop) => emit(&format!("session complete after {elapsed}")),
        Some(StopReason::Manual) => emit(&format!("session stopped after {elapsed}")),
        None => emit("no session was running"),
    }

    let stats = driver.stats();
    if stats.failed > 0 || stats.unsupported > 0 {
        emit(&format!(
            "notifications: {} shown, {} not shown, {} failed",
            stats.shown, stats.unsupported, stats.failed
        ));
    }
    Ok(())
}

/// Writes a line to stdout. A closed stdout must not take the session down.
fn emit(line: &str) {
    let _ = writeln!(std::io::stdout().lock(), "{line}");
}

fn render(snapshot: &Snapshot, transition: Option<&Transition>) {
    let mut out = std::io::stdout().lock();
    if let Some(transition) = transition {
        let at = transition.event.at().with_timezone(&chrono::Local);
        let line = match &transition.event {
            Event::BreakStarted { .. } => "break: look 20 feet away for 20 seconds",
            Event::WorkResumed { .. } => "break over",
            Event::SessionStopped { .. } => "session cap reached",
            _ => "",
        };
        if !line.is_empty() {
            let _ = writeln!(out, "\r{:<72}", format!("[{}] {line}", at.format("%H:%M:%S")));
        }
    }
    if snapshot.state.is_active() {
        let _ = write!(out, "\r{:<72}", snapshot.status_line());
    }
    let _ = out.flush();
}

fn parse_command(line: &str) -> Option<Control> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(Control::Pause),
        "r" | "resume" => Some(Control::Resume),
        "reset" | "restart" => Some(Control::RestartWork),
        "s" | "q" | "stop" | "quit" => Some(Control::Stop),
        _ => None,
    }
}

async fn read_commands(tx: mpsc::Sender<Control>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(command) = parse_command(&line) else {
                    if !line.trim().is_empty() {
                        warn!(input = %line.trim(), "unknown command");
                    }
                    continue;
                };
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "stdin closed");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stdin_commands() {
        assert_eq!(parse_command("p"), Some(Control::Pause));
        assert_eq!(parse_command(" Resume \n"), Some(Control::Resume));
        assert_eq!(parse_command("q"), Some(Control::Stop));
        assert_eq!(parse_command("stop"), Some(Control::Stop));
        assert_eq!(parse_command("reset"), Some(Control::RestartWork));
        assert_eq!(parse_command("RESTART"), Some(Control::RestartWork));
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command(""), None);
    }
}
