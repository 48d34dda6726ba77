//! Application state and composition.

use std::sync::Arc;

use mojo_domain::{DomainError, SchemaRegistry, SystemManifest};

use crate::infrastructure::ports::{ClockPort, DocumentStore, NotificationPort, SettingsRepo};
use crate::use_cases;

/// Main application state.
///
/// Holds the schema registry and all use cases.
pub struct App {
    pub registry: Arc<SchemaRegistry>,
    pub manifest: SystemManifest,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub migration: use_cases::WorldMigration,
    pub settings: Arc<use_cases::SettingsOps>,
}

impl App {
    /// Build the registry and wire the use cases.
    ///
    /// Fails when the built-in schemas conflict or a subtype's defaults do not
    /// satisfy its own schema; nothing can run safely in that case.
    pub fn new(
        manifest: SystemManifest,
        store: Arc<dyn DocumentStore>,
        settings_repo: Arc<dyn SettingsRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, DomainError> {
        let registry = Arc::new(SchemaRegistry::with_builtin()?);
        tracing::info!(
            subtypes = registry.len(),
            version = %manifest.version,
            "Schema registry ready"
        );

        let settings = Arc::new(use_cases::SettingsOps::new(settings_repo));
        let migration = use_cases::WorldMigration::new(
            registry.clone(),
            manifest.clone(),
            store,
            settings.clone(),
            notifier,
            clock,
        );

        Ok(Self {
            registry,
            manifest,
            use_cases: UseCases {
                migration,
                settings,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockDocumentStore, MockNotificationPort, MockSettingsRepo};
    use chrono::{TimeZone, Utc};
    use mojo_domain::Subtype;

    #[test]
    fn registers_every_builtin_subtype() {
        let app = App::new(
            SystemManifest::builtin(None).unwrap(),
            Arc::new(MockDocumentStore::new()),
            Arc::new(MockSettingsRepo::new()),
            Arc::new(MockNotificationPort::new()),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())),
        )
        .unwrap();

        assert_eq!(app.registry.len(), Subtype::all().len());
        assert_eq!(app.use_cases.migration.manifest(), &app.manifest);
    }
}
