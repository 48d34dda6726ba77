//! Whether a world needs migrating, decided from its recorded version.

use crate::version::{SystemManifest, SystemVersion};

/// Outcome of checking a world against the installed system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationDecision {
    /// Fresh world: record the installed version, nothing to migrate
    RecordVersion,
    /// Last migrated at or after the threshold
    UpToDate,
    /// Migrate every document; `too_old` worlds predate the compatible version
    /// and may not migrate cleanly
    Migrate { too_old: bool },
}

/// Decide what to do with a world.
///
/// `recorded` is the world's last migration version, if any; `document_count`
/// is the number of stored documents.
pub fn decide(
    manifest: &SystemManifest,
    recorded: Option<&SystemVersion>,
    document_count: usize,
) -> MigrationDecision {
    match recorded {
        None if document_count == 0 => MigrationDecision::RecordVersion,
        None => MigrationDecision::Migrate { too_old: false },
        Some(current) if *current >= manifest.needs_migration_version => {
            MigrationDecision::UpToDate
        }
        Some(current) => MigrationDecision::Migrate {
            too_old: *current < manifest.compatible_migration_version,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> SystemManifest {
        SystemManifest::builtin(None).unwrap()
    }

    fn v(raw: &str) -> SystemVersion {
        SystemVersion::parse(raw).unwrap()
    }

    #[test]
    fn empty_unversioned_world_records_version() {
        assert_eq!(decide(&manifest(), None, 0), MigrationDecision::RecordVersion);
    }

    #[test]
    fn unversioned_world_with_documents_migrates() {
        assert_eq!(
            decide(&manifest(), None, 3),
            MigrationDecision::Migrate { too_old: false }
        );
    }

    #[test]
    fn current_world_is_up_to_date() {
        assert_eq!(decide(&manifest(), Some(&v("2.1.0")), 10), MigrationDecision::UpToDate);
        assert_eq!(decide(&manifest(), Some(&v("2.2.0")), 10), MigrationDecision::UpToDate);
    }

    #[test]
    fn older_world_migrates() {
        assert_eq!(
            decide(&manifest(), Some(&v("1.6.3")), 10),
            MigrationDecision::Migrate { too_old: false }
        );
    }

    #[test]
    fn ancient_world_is_flagged_too_old_but_still_migrates() {
        assert_eq!(
            decide(&manifest(), Some(&v("0.7.9")), 10),
            MigrationDecision::Migrate { too_old: true }
        );
    }
}
