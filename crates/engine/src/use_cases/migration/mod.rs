//! World migration use cases.
//!
//! Brings every stored document of a world up to the installed system's
//! schemas: decide whether the world needs it, run each document through its
//! migration plan and construction, admit it through the validation gate and
//! write back only what changed.

mod error;
mod report;
mod world_migration;

pub use error::MigrationError;
pub use report::MigrationReport;
pub use world_migration::{MigrationOutcome, WorldMigration};
