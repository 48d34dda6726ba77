//! World-scoped system settings value object.
//!
//! Stored as one JSON blob per world by the settings repository; missing keys
//! fall back to their defaults so older blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::ids::WorldId;
use crate::validation::ValidationMode;
use crate::version::SystemVersion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    /// World these settings belong to. None = not yet bound to a world.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_id: Option<WorldId>,

    /// Reject documents that fail validation instead of flagging them
    #[serde(default = "default_strict_validation")]
    pub strict_validation: bool,

    /// Last system version this world was migrated to; empty if never
    #[serde(default)]
    pub system_migration_version: String,
}

fn default_strict_validation() -> bool {
    true
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            world_id: None,
            strict_validation: default_strict_validation(),
            system_migration_version: String::new(),
        }
    }
}

impl SystemSettings {
    pub fn for_world(world_id: WorldId) -> Self {
        Self {
            world_id: Some(world_id),
            ..Self::default()
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        ValidationMode::from_strict(self.strict_validation)
    }

    /// The recorded migration version; blank or unreadable counts as none.
    pub fn migration_version(&self) -> Option<SystemVersion> {
        SystemVersion::parse(&self.system_migration_version).ok()
    }

    pub fn record_migration(&mut self, version: &SystemVersion) {
        self.system_migration_version = version.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_unmigrated() {
        let settings = SystemSettings::default();
        assert!(settings.strict_validation);
        assert_eq!(settings.migration_version(), None);
        assert_eq!(settings.validation_mode(), ValidationMode::Strict);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let settings: SystemSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, SystemSettings::default());
    }

    #[test]
    fn serializes_camel_case() {
        let mut settings = SystemSettings::for_world(WorldId::new("w1"));
        settings.record_migration(&SystemVersion::parse("2.1.0").unwrap());
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "worldId": "w1",
                "strictValidation": true,
                "systemMigrationVersion": "2.1.0"
            })
        );
    }
}
