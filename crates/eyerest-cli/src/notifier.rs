//! Notifier adapters for the terminal host.

use std::io::{Stdout, Write};

use eyerest_core::{Notice, NotificationDeliveryError, Notifier, PermissionProbe};
use notify_rust::Notification;

const APP_NAME: &str = "eyerest";

/// Desktop notifications through the platform notification service.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&mut self, notice: &Notice) -> Result<bool, NotificationDeliveryError> {
        let mut notification = Notification::new();
        notification
            .summary(&notice.title)
            .body(&notice.body)
            .appname(APP_NAME)
            .icon("dialog-information");

        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(notify_rust::Urgency::Normal);

        notification
            .show()
            .map(|_| true)
            .map_err(|e| NotificationDeliveryError::new(e.to_string()))
    }
}

impl PermissionProbe for DesktopNotifier {
    #[cfg(all(unix, not(target_os = "macos")))]
    fn notifications_supported(&self) -> bool {
        notify_rust::get_server_information().is_ok()
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn notifications_supported(&self) -> bool {
        true
    }
}

/// Writes notices to a terminal stream, stdout unless told otherwise.
pub struct ConsoleNotifier<W = Stdout> {
    out: W,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn notify(&mut self, notice: &Notice) -> Result<bool, NotificationDeliveryError> {
        writeln!(self.out, "\r\n** {} {}", notice.title, notice.body)
            .and_then(|()| self.out.flush())
            .map_err(|e| NotificationDeliveryError::new(format!("console write failed: {e}")))?;
        Ok(true)
    }
}

impl<W> PermissionProbe for ConsoleNotifier<W> {
    fn notifications_supported(&self) -> bool {
        true
    }
}

/// The notifier picked for a run.
pub enum HostNotifier {
    Desktop(DesktopNotifier),
    Console(ConsoleNotifier),
}

impl HostNotifier {
    /// Desktop when requested and available, console otherwise.
    pub fn select(prefer_desktop: bool) -> Self {
        if prefer_desktop {
            let desktop = DesktopNotifier;
            if desktop.notifications_supported() {
                return HostNotifier::Desktop(desktop);
            }
            tracing::warn!("desktop notifications unavailable, printing reminders instead");
        }
        HostNotifier::Console(ConsoleNotifier::stdout())
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostNotifier::Desktop(_) => "desktop",
            HostNotifier::Console(_) => "console",
        }
    }
}

impl Notifier for HostNotifier {
    fn notify(&mut self, notice: &Notice) -> Result<bool, NotificationDeliveryError> {
        match self {
            HostNotifier::Desktop(n) => n.notify(notice),
            HostNotifier::Console(n) => n.notify(notice),
        }
    }
}

impl PermissionProbe for HostNotifier {
    fn notifications_supported(&self) -> bool {
        match self {
            HostNotifier::Desktop(n) => n.notifications_supported(),
            HostNotifier::Console(n) => n.notifications_supported(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyerest_core::NoticeKind;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn console_writes_title_and_body() {
        let mut notifier = ConsoleNotifier::new(Vec::new());
        assert!(notifier.notify(&Notice::for_kind(NoticeKind::BreakStarted)).unwrap());
        let text = String::from_utf8(notifier.out).unwrap();
        assert!(text.contains("Time for a 20-20-20 break!"));
        assert!(text.contains("20 feet away"));
    }

    #[test]
    fn closed_console_reports_error_instead_of_panicking() {
        let mut notifier = ConsoleNotifier::new(ClosedPipe);
        let err = notifier
            .notify(&Notice::for_kind(NoticeKind::BreakStarted))
            .unwrap_err();
        assert!(err.message.contains("console write failed"));
    }

    #[test]
    fn console_is_always_supported() {
        let mut notifier = HostNotifier::select(false);
        assert_eq!(notifier.name(), "console");
        assert!(notifier.notifications_supported());
        assert!(notifier.notify(&Notice::for_kind(NoticeKind::BreakStarted)).unwrap());
    }
}
