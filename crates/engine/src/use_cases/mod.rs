//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod migration;
pub mod settings;

pub use migration::{MigrationError, MigrationOutcome, MigrationReport, WorldMigration};
pub use settings::{SettingsError, SettingsOps};
