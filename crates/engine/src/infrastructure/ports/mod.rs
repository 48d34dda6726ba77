//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Document storage (could swap JSON files -> host database)
//! - Settings storage
//! - Notifications and the clock (for testing)

mod error;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{Collection, DocumentStore, SettingsRepo};

#[cfg(test)]
pub use repos::{MockDocumentStore, MockSettingsRepo};

// =============================================================================
// Host Ports
// =============================================================================
pub use testing::{ClockPort, NotificationPort};

#[cfg(test)]
pub use testing::{MockClockPort, MockNotificationPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
