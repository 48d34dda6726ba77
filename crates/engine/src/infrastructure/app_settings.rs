//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `MOJO_WORLD_DIR` - Directory holding the world's collection files (default: `world`)
//! - `MOJO_WORLD_ID` - World identifier (default: the world directory's name)
//! - `MOJO_SETTINGS_DB` - SQLite file for system settings (default: `mojo-settings.db`)
//! - `MOJO_SYSTEM_VERSION` - Report a different installed system version (default: built-in)

use std::path::{Path, PathBuf};

use mojo_domain::WorldId;

/// Helper function to read environment variable with default fallback
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub world_dir: PathBuf,
    pub world_id: WorldId,
    pub settings_db: String,
    /// Installed version override; None uses the built-in manifest
    pub system_version: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let world_dir = PathBuf::from("world");
        Self {
            world_id: world_id_for(&world_dir),
            world_dir,
            settings_db: "mojo-settings.db".into(),
            system_version: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let world_dir: PathBuf = env_or("MOJO_WORLD_DIR", defaults.world_dir);
        let world_id = std::env::var("MOJO_WORLD_ID")
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(WorldId::new)
            .unwrap_or_else(|| world_id_for(&world_dir));

        Self {
            world_id,
            world_dir,
            settings_db: env_or("MOJO_SETTINGS_DB", defaults.settings_db),
            system_version: std::env::var("MOJO_SYSTEM_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}

/// Worlds are identified by their directory name unless configured otherwise.
fn world_id_for(dir: &Path) -> WorldId {
    dir.file_name()
        .and_then(|name| name.to_str())
        .map(WorldId::new)
        .unwrap_or_else(|| WorldId::new("world"))
}
