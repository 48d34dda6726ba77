//! Notifications rendered as tracing events.

use mojo_domain::{Notification, Severity};

use crate::infrastructure::ports::NotificationPort;

/// Notifier for headless runs: every notification becomes a log line.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationPort for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        let permanent = notification.permanent;
        let message = notification.message.as_str();
        match notification.severity {
            Severity::Info => tracing::info!(permanent, "{message}"),
            Severity::Warning => tracing::warn!(permanent, "{message}"),
            Severity::Error => tracing::error!(permanent, "{message}"),
        }
    }
}
