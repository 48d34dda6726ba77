use chrono::{DateTime, Utc};
use mojo_domain::{SystemVersion, WorldId};
use serde::Serialize;

/// Summary of one world migration run.
///
/// `migrated`, `unchanged`, `invalid`, `rejected` and `skipped` count documents,
/// embedded items included; each document lands in exactly one of them.
/// `saved` and `failed` count writes to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub world_id: WorldId,
    /// Version the world was last migrated to; None for legacy worlds
    pub from_version: Option<String>,
    pub to_version: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Valid documents whose tree changed
    pub migrated: usize,
    /// Valid documents already in current shape
    pub unchanged: usize,
    /// Admitted with a violation, including strict refusals written back after
    /// the downgrade to permissive
    pub invalid: usize,
    /// Refused under strict validation and left as stored. Only a cancelled
    /// run ends with any; otherwise they are re-admitted as invalid.
    pub rejected: usize,
    /// Documents whose type has no registered schema
    pub skipped: usize,

    pub saved: usize,
    pub failed: usize,

    /// Unrecognized legacy values replaced by defaults
    pub legacy_values: usize,
    pub strictness_downgraded: bool,
    pub cancelled: bool,
}

impl MigrationReport {
    pub fn new(
        world_id: WorldId,
        from: Option<&SystemVersion>,
        to: &SystemVersion,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            world_id,
            from_version: from.map(ToString::to_string),
            to_version: to.to_string(),
            started_at,
            finished_at: started_at,
            migrated: 0,
            unchanged: 0,
            invalid: 0,
            rejected: 0,
            skipped: 0,
            saved: 0,
            failed: 0,
            legacy_values: 0,
            strictness_downgraded: false,
            cancelled: false,
        }
    }

    pub fn documents(&self) -> usize {
        self.migrated + self.unchanged + self.invalid + self.rejected + self.skipped
    }

    /// Completed without any document refused, skipped or lost to a store failure.
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.rejected == 0 && self.skipped == 0 && self.failed == 0
    }
}
