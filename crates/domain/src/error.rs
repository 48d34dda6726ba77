//! Unified error types for the domain layer
//!
//! Registration problems are fatal at startup, schema violations are fatal for a
//! single document only. Unrecognized legacy values are not errors at all; they are
//! recorded as [`LegacyValue`](crate::migration::LegacyValue) notes.

use thiserror::Error;

use crate::schema::SchemaViolation;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A constructed document failed one of its declared constraints
    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    /// Two composed templates declare the same field without an explicit override
    #[error("Registration conflict in {schema}: field '{field}' is declared by both '{first}' and '{second}'")]
    RegistrationConflict {
        schema: String,
        field: String,
        first: String,
        second: String,
    },

    /// A registered schema cannot be constructed from its own defaults
    #[error("Invalid default for {schema}: {violation}")]
    InvalidDefault {
        schema: String,
        violation: SchemaViolation,
    },

    /// No schema is registered for the requested subtype
    #[error("Unknown subtype: {kind} '{name}'")]
    UnknownSubtype { kind: &'static str, name: String },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a registration conflict error
    pub fn registration_conflict(
        schema: impl Into<String>,
        field: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::RegistrationConflict {
            schema: schema.into(),
            field: field.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an unknown subtype error
    pub fn unknown_subtype(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownSubtype {
            kind,
            name: name.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether this error must abort system startup.
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Self::RegistrationConflict { .. } | Self::InvalidDefault { .. }
        )
    }
}
