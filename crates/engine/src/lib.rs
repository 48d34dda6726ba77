//! Mojo Engine library.
//!
//! Runs the document schema and migration domain against a stored world.
//!
//! ## Structure
//!
//! - `use_cases/` - World migration and settings orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
