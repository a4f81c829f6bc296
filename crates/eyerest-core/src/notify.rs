//! Notification ports.
//!
//! The session machine never talks to a notification sink. It yields a
//! [`Notice`] alongside the transition that produced it, and the driver
//! hands that notice to a [`Notifier`]. Delivery is best-effort: a
//! `false` or an error is logged and the session carries on.

use serde::{Deserialize, Serialize};

use crate::error::NotificationDeliveryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    BreakStarted,
    WorkResumed,
    SessionComplete,
}

/// A notification intent: what to tell the user, not how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn for_kind(kind: NoticeKind) -> Self {
        let (title, body) = match kind {
            NoticeKind::BreakStarted => (
                "Time for a 20-20-20 break!",
                "Look at something 20 feet away for 20 seconds to rest your eyes.",
            ),
            NoticeKind::WorkResumed => ("Back to work", "Break is over. Next reminder in 20 minutes."),
            NoticeKind::SessionComplete => (
                "Session complete",
                "Your session reached its time limit. Nice work looking after your eyes.",
            ),
        };
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Which transitions raise a notice.
///
/// Two behaviours exist in the wild: notify only when a break starts, or
/// also when work resumes. The default is the former plus a final notice
/// when the session cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    #[serde(default = "default_true")]
    pub on_break_start: bool,
    #[serde(default)]
    pub on_work_resume: bool,
    #[serde(default = "default_true")]
    pub on_auto_stop: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            on_break_start: true,
            on_work_resume: false,
            on_auto_stop: true,
        }
    }
}

impl NotificationPolicy {
    /// A policy that never raises a notice.
    pub fn silent() -> Self {
        Self {
            on_break_start: false,
            on_work_resume: false,
            on_auto_stop: false,
        }
    }

    pub fn allows(&self, kind: NoticeKind) -> bool {
        match kind {
            NoticeKind::BreakStarted => self.on_break_start,
            NoticeKind::WorkResumed => self.on_work_resume,
            NoticeKind::SessionComplete => self.on_auto_stop,
        }
    }
}

/// Sink for notices.
///
/// `Ok(true)` means the notice was shown, `Ok(false)` means the platform
/// has no way to show it. Implementations must not panic.
pub trait Notifier {
    fn notify(&mut self, notice: &Notice) -> Result<bool, NotificationDeliveryError>;
}

/// Answers whether notifications can be shown at all. Queried once per
/// session start; the answer never affects timing.
pub trait PermissionProbe {
    fn notifications_supported(&self) -> bool;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&mut self, notice: &Notice) -> Result<bool, NotificationDeliveryError> {
        (**self).notify(notice)
    }
}

impl<T: PermissionProbe + ?Sized> PermissionProbe for Box<T> {
    fn notifications_supported(&self) -> bool {
        (**self).notifications_supported()
    }
}

/// Notifier that keeps every notice it receives.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub received: Vec<Notice>,
    pub supported: bool,
    /// When set, every delivery fails with this message.
    pub fail_with: Option<String>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            supported: true,
            ..Self::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            supported: true,
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.received.iter().map(|n| n.kind).collect()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: &Notice) -> Result<bool, NotificationDeliveryError> {
        if let Some(message) = &self.fail_with {
            return Err(NotificationDeliveryError::new(message.clone()));
        }
        self.received.push(notice.clone());
        Ok(self.supported)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl PermissionProbe for RecordingNotifier {
    fn notifications_supported(&self) -> bool {
        self.supported
    }
}
