//! System versions and the migration thresholds that travel with them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A dotted numeric version such as `2.1.0`.
///
/// Ordering compares component by component; missing trailing components count
/// as zero, so `0.8` and `0.8.0` are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SystemVersion {
    parts: Vec<u64>,
    raw: String,
}

impl SystemVersion {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::parse("empty system version"));
        }
        let parts = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| DomainError::parse(format!("invalid system version '{raw}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            parts,
            raw: trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for SystemVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SystemVersion {}

impl PartialOrd for SystemVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SystemVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for SystemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SystemVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SystemVersion {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SystemVersion> for String {
    fn from(version: SystemVersion) -> Self {
        version.raw
    }
}

/// The installed system version and the thresholds that decide whether a world
/// needs migrating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemManifest {
    /// Version of the installed system
    pub version: SystemVersion,
    /// Worlds last migrated before this version are migrated on startup
    pub needs_migration_version: SystemVersion,
    /// Worlds last migrated before this version are too old to migrate safely
    pub compatible_migration_version: SystemVersion,
}

impl SystemManifest {
    pub const SYSTEM_VERSION: &'static str = "2.1.0";
    pub const NEEDS_MIGRATION_VERSION: &'static str = "2.1.0";
    pub const COMPATIBLE_MIGRATION_VERSION: &'static str = "0.8";

    pub fn new(
        version: &str,
        needs_migration_version: &str,
        compatible_migration_version: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            version: SystemVersion::parse(version)?,
            needs_migration_version: SystemVersion::parse(needs_migration_version)?,
            compatible_migration_version: SystemVersion::parse(compatible_migration_version)?,
        })
    }

    /// Manifest of this build, optionally reporting a different installed version.
    pub fn builtin(version: Option<&str>) -> Result<Self, DomainError> {
        Self::new(
            version.unwrap_or(Self::SYSTEM_VERSION),
            Self::NEEDS_MIGRATION_VERSION,
            Self::COMPATIBLE_MIGRATION_VERSION,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> SystemVersion {
        SystemVersion::parse(raw).unwrap()
    }

    #[test]
    fn compares_component_wise() {
        assert!(v("2.1.0") > v("2.0.9"));
        assert!(v("2.10.0") > v("2.9.3"));
        assert!(v("0.8") < v("1.6.3"));
        assert_eq!(v("0.8"), v("0.8.0"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(SystemVersion::parse("").is_err());
        assert!(SystemVersion::parse("2.x").is_err());
        assert!(SystemVersion::parse("v2").is_err());
    }

    #[test]
    fn keeps_raw_text() {
        assert_eq!(v(" 2.1.0 ").to_string(), "2.1.0");
    }

    #[test]
    fn serde_round_trips_as_string() {
        let json = serde_json::to_string(&v("1.6.3")).unwrap();
        assert_eq!(json, "\"1.6.3\"");
        let back: SystemVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("1.6.3"));
    }

    #[test]
    fn builtin_manifest_thresholds() {
        let manifest = SystemManifest::builtin(None).unwrap();
        assert_eq!(manifest.version, v("2.1.0"));
        assert_eq!(manifest.needs_migration_version, v("2.1.0"));
        assert_eq!(manifest.compatible_migration_version, v("0.8"));
        assert_eq!(SystemManifest::builtin(Some("2.2.0")).unwrap().version, v("2.2.0"));
    }
}
