//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod app_settings;
pub mod clock;
pub mod document_store;
pub mod notifications;
pub mod ports;
pub mod settings;
