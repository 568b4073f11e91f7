use std::sync::{Arc, Mutex as StdMutex};

use agent_console_error::{Notification, NotificationLevel};

/// Sink for the single user-visible artifact an async operation produces.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Default notifier for the binary: notifications become log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(message = %notification.message, "notification"),
            NotificationLevel::Error => tracing::warn!(message = %notification.message, "notification"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<StdMutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.notifications.lock() {
            guard.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.notifications.lock() {
            guard.push(notification);
        }
    }
}
