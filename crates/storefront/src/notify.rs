//! Transient user-facing notifications ("toasts").

use std::time::Duration;

/// How long a toast stays up unless dismissed.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A short message shown to the shopper and dismissed automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub dismiss_after: Duration,
}

impl Notification {
    /// Create a success notification.
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationKind::Success)
    }

    /// Create an error notification.
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationKind::Error)
    }

    fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            dismiss_after: DEFAULT_DISMISS_AFTER,
        }
    }
}

/// Displays notifications. Fire-and-forget: callers never wait on it.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that writes every notification to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                title = %notification.title,
                "{}",
                notification.message
            ),
            NotificationKind::Error => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.message
            ),
        }
    }
}
