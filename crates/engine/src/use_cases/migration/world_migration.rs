use std::sync::Arc;

use mojo_domain::{
    decide, DocumentKind, DocumentRef, Migrated, MigrationDecision, Notification,
    PersistedDocument, SchemaRegistry, SystemManifest, SystemSettings, SystemVersion,
    ValidationGate, WorldId,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{MigrationError, MigrationReport};
use crate::infrastructure::ports::{ClockPort, Collection, DocumentStore, NotificationPort};
use crate::use_cases::settings::SettingsOps;

/// What a call to [`WorldMigration::execute`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Empty world: the installed version was recorded, nothing migrated
    VersionRecorded(SystemVersion),
    /// The world was already migrated far enough
    UpToDate,
    /// A migration ran (possibly cancelled part way; see the report)
    Completed(MigrationReport),
}

/// Migrate every document of a world to the installed system version.
pub struct WorldMigration {
    registry: Arc<SchemaRegistry>,
    manifest: SystemManifest,
    store: Arc<dyn DocumentStore>,
    settings: Arc<SettingsOps>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
}

impl WorldMigration {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        manifest: SystemManifest,
        store: Arc<dyn DocumentStore>,
        settings: Arc<SettingsOps>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            registry,
            manifest,
            store,
            settings,
            notifier,
            clock,
        }
    }

    pub fn manifest(&self) -> &SystemManifest {
        &self.manifest
    }

    /// Decide whether the world needs migrating and, if so, migrate it.
    ///
    /// `cancel` is checked between documents; a cancelled run leaves the
    /// recorded version untouched so the next start picks up again.
    pub async fn execute(
        &self,
        world_id: &WorldId,
        cancel: &CancellationToken,
    ) -> Result<MigrationOutcome, MigrationError> {
        let settings = self.settings.get_for_world(world_id).await?;
        let recorded = settings.migration_version();
        let documents = self.store.count().await?;

        match decide(&self.manifest, recorded.as_ref(), documents) {
            MigrationDecision::RecordVersion => {
                self.settings
                    .record_migration(world_id, &self.manifest.version)
                    .await?;
                tracing::info!(
                    world_id = %world_id,
                    version = %self.manifest.version,
                    "New world, recorded system version"
                );
                Ok(MigrationOutcome::VersionRecorded(self.manifest.version.clone()))
            }
            MigrationDecision::UpToDate => {
                tracing::debug!(
                    world_id = %world_id,
                    version = %settings.system_migration_version,
                    "World is up to date"
                );
                Ok(MigrationOutcome::UpToDate)
            }
            MigrationDecision::Migrate { too_old } => {
                if too_old {
                    tracing::warn!(
                        world_id = %world_id,
                        version = %settings.system_migration_version,
                        compatible = %self.manifest.compatible_migration_version,
                        "World is older than the oldest compatible version"
                    );
                    self.notifier.notify(&Notification::version_too_old());
                }
                self.run(world_id, settings, cancel)
                    .await
                    .map(MigrationOutcome::Completed)
            }
        }
    }

    async fn run(
        &self,
        world_id: &WorldId,
        mut settings: SystemSettings,
        cancel: &CancellationToken,
    ) -> Result<MigrationReport, MigrationError> {
        let version = &self.manifest.version;
        let mut report = MigrationReport::new(
            world_id.clone(),
            settings.migration_version().as_ref(),
            version,
            self.clock.now(),
        );
        let mut gate = ValidationGate::new(settings.validation_mode());
        let mut held = Vec::new();

        self.notifier.notify(&Notification::migration_begin(version));
        tracing::info!(
            world_id = %world_id,
            to = %version,
            mode = ?gate.mode(),
            "Starting world migration"
        );

        for collection in Collection::ALL {
            if !self
                .migrate_collection(collection, &mut gate, &mut report, &mut held, cancel)
                .await?
            {
                report.cancelled = true;
                break;
            }
        }

        if report.cancelled {
            report.finished_at = self.clock.now();
            tracing::warn!(
                world_id = %world_id,
                documents = report.documents(),
                "World migration cancelled"
            );
            return Ok(report);
        }

        let downgrade = gate.review();
        if downgrade.is_some() {
            settings.strict_validation = false;
            report.strictness_downgraded = true;
            self.readmit(held, &mut gate, &mut report).await;
        }
        report.finished_at = self.clock.now();

        settings.record_migration(version);
        self.settings.update_for_world(world_id, settings).await?;

        if let Some(downgrade) = downgrade {
            tracing::warn!(
                world_id = %world_id,
                invalid = downgrade.invalid,
                "Strict validation disabled for world"
            );
            self.notifier.notify(&downgrade.notification);
        }
        self.notifier.notify(&Notification::migration_complete(version));

        tracing::info!(
            world_id = %world_id,
            migrated = report.migrated,
            unchanged = report.unchanged,
            invalid = report.invalid,
            rejected = report.rejected,
            skipped = report.skipped,
            failed = report.failed,
            legacy_values = report.legacy_values,
            "World migration complete"
        );
        Ok(report)
    }

    /// Migrate one collection and write its changed documents in one batch.
    ///
    /// Documents with a part the gate rejected are not written; they go to
    /// `held` for [`Self::readmit`]. Returns false when cancelled before the
    /// collection was finished. What was migrated up to that point is still
    /// written.
    async fn migrate_collection(
        &self,
        collection: Collection,
        gate: &mut ValidationGate,
        report: &mut MigrationReport,
        held: &mut Vec<(Collection, PersistedDocument)>,
        cancel: &CancellationToken,
    ) -> Result<bool, MigrationError> {
        let documents = self.store.list(collection).await?;
        tracing::debug!(
            collection = %collection,
            count = documents.len(),
            "Migrating collection"
        );

        let mut pending = Vec::new();
        let mut finished = true;
        for document in documents {
            if cancel.is_cancelled() {
                finished = false;
                break;
            }
            let rejected = report.rejected;
            let updated = self.migrate_document(collection.kind(), &document, gate, report);
            if report.rejected > rejected {
                held.push((collection, document));
            } else if let Some(updated) = updated {
                pending.push(updated);
            }
        }

        self.flush(collection, &pending, report).await;
        Ok(finished)
    }

    /// Second look at documents strict validation refused, now that the gate
    /// is permissive: their migrated trees are written back flagged invalid.
    async fn readmit(
        &self,
        held: Vec<(Collection, PersistedDocument)>,
        gate: &mut ValidationGate,
        report: &mut MigrationReport,
    ) {
        for collection in Collection::ALL {
            // The first pass already counted every valid part and legacy
            // value of these documents; only the invalid admissions carry over.
            let mut recount = report.clone();
            let pending: Vec<PersistedDocument> = held
                .iter()
                .filter(|(held_in, _)| *held_in == collection)
                .filter_map(|(_, document)| {
                    self.migrate_document(collection.kind(), document, gate, &mut recount)
                })
                .collect();

            let readmitted = recount.invalid - report.invalid;
            report.rejected -= readmitted;
            report.invalid += readmitted;
            if readmitted > 0 {
                tracing::info!(
                    collection = %collection,
                    readmitted,
                    "Writing back documents refused under strict validation"
                );
            }
            self.flush(collection, &pending, report).await;
        }
    }

    /// Write a batch; if the batch write fails, retry one document at a time
    /// so a single bad document only fails itself.
    async fn flush(
        &self,
        collection: Collection,
        documents: &[PersistedDocument],
        report: &mut MigrationReport,
    ) {
        if documents.is_empty() {
            return;
        }
        let Err(e) = self.store.save_all(collection, documents).await else {
            report.saved += documents.len();
            return;
        };
        tracing::warn!(
            collection = %collection,
            count = documents.len(),
            error = %e,
            "Batch write failed, saving documents one by one"
        );

        for document in documents {
            match self.store.save(collection, document).await {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        collection = %collection,
                        document_id = %document.id,
                        error = %e,
                        "Failed to save migrated document"
                    );
                }
            }
        }
    }

    /// Migrate a stored document and its embedded items. Returns the document
    /// to write back, or None when nothing changed.
    fn migrate_document(
        &self,
        kind: DocumentKind,
        document: &PersistedDocument,
        gate: &mut ValidationGate,
        report: &mut MigrationReport,
    ) -> Option<PersistedDocument> {
        let at = DocumentRef::new(kind, document.id.clone());
        let system = self.migrate_system(at, document, gate, report);
        let items: Vec<Option<Value>> = document
            .items
            .iter()
            .map(|item| {
                let at = DocumentRef::new(DocumentKind::Item, item.id.clone())
                    .embedded_in(document.id.clone());
                self.migrate_system(at, item, gate, report)
            })
            .collect();

        if system.is_none() && items.iter().all(Option::is_none) {
            return None;
        }

        let stamp = self.manifest.version.to_string();
        let mut updated = document.clone();
        if let Some(system) = system {
            updated.system = system;
            updated.system_version = Some(stamp.clone());
        }
        for (item, system) in updated.items.iter_mut().zip(items) {
            if let Some(system) = system {
                item.system = system;
                item.system_version = Some(stamp.clone());
            }
        }
        Some(updated)
    }

    /// Migrate, construct and admit one `system` tree. Returns the new tree
    /// when it differs from the stored one.
    fn migrate_system(
        &self,
        at: DocumentRef,
        document: &PersistedDocument,
        gate: &mut ValidationGate,
        report: &mut MigrationReport,
    ) -> Option<Value> {
        let schema = match self.registry.resolve(at.kind, &document.subtype) {
            Ok(schema) => schema,
            Err(e) => {
                report.skipped += 1;
                tracing::warn!(document = %at, error = %e, "Skipping document");
                return None;
            }
        };

        let Migrated { source, notes } = schema.migrate(&document.system);
        for note in notes.entries() {
            tracing::debug!(
                document = %at,
                rule = note.rule,
                path = %note.path,
                found = %note.found,
                resolved = %note.resolved,
                "Replaced unrecognized legacy value"
            );
        }
        report.legacy_values += notes.len();

        let constructed = self.registry.construct(schema, &source);
        let admitted = match gate.admit(at, source, constructed) {
            Ok(admitted) => admitted,
            Err(rejected) => {
                report.rejected += 1;
                tracing::warn!(
                    document = %rejected.id,
                    subtype = %schema.subtype(),
                    violation = %rejected.violation,
                    "Rejected document"
                );
                return None;
            }
        };

        if admitted.invalid {
            report.invalid += 1;
            if let Some(violation) = gate.invalid_documents().get(&admitted.id) {
                tracing::warn!(
                    document = %admitted.id,
                    subtype = %schema.subtype(),
                    violation = %violation,
                    "Document kept as invalid"
                );
            }
        }

        if admitted.system == document.system {
            if !admitted.invalid {
                report.unchanged += 1;
            }
            return None;
        }
        if !admitted.invalid {
            report.migrated += 1;
        }
        Some(admitted.system)
    }
}
