use chrono::{DateTime, Utc};
use mojo_domain::Notification;

// =============================================================================
// Clock
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// User-facing notifications
// =============================================================================

/// Host notification facility. The engine produces content and severity only.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPort: Send + Sync {
    fn notify(&self, notification: &Notification);
}
