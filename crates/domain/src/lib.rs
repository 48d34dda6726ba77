pub mod config;
pub mod document;
pub mod error;
pub mod ids;
pub mod migration;
pub mod notification;
pub mod schema;
pub mod settings;
pub mod subtypes;
pub mod templates;
pub mod validation;
pub mod value;
pub mod version;

pub use error::DomainError;

pub use document::{DocumentKind, PersistedDocument, Subtype};
pub use ids::{DocumentId, WorldId};

// Schema registry and construction
pub use schema::{
    compose, construct, Constraint, FieldDescriptor, FieldKind, FieldPath, SchemaFields,
    SchemaRegistry, SchemaViolation, SubtypeSchema, Template,
};

// Migration
pub use migration::{
    decide, LegacyValue, Migrated, MigrationDecision, MigrationNotes, MigrationPass,
    MigrationPlan, MigrationRule,
};

pub use notification::{Notification, Severity};
pub use settings::SystemSettings;
pub use validation::{
    AdmittedDocument, DocumentRef, InvalidDocumentIndex, ModeDowngrade, RejectedDocument,
    ValidationGate, ValidationMode,
};
pub use version::{SystemManifest, SystemVersion};
