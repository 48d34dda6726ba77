//! SQLite-backed system settings storage.

use async_trait::async_trait;
use mojo_domain::{SystemSettings, WorldId};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, RepoError, SettingsRepo};

/// SQLite implementation for world-scoped system settings.
pub struct SqliteSettingsRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteSettingsRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("settings", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS system_settings (
                world_id TEXT PRIMARY KEY NOT NULL,
                settings_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("settings", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl SettingsRepo for SqliteSettingsRepo {
    async fn get_for_world(&self, world_id: &WorldId) -> Result<Option<SystemSettings>, RepoError> {
        let row = sqlx::query("SELECT settings_json FROM system_settings WHERE world_id = ?")
            .bind(world_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("settings", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("settings_json");
                let settings = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    async fn save_for_world(
        &self,
        world_id: &WorldId,
        settings: &SystemSettings,
    ) -> Result<(), RepoError> {
        let json = serde_json::to_string(settings).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO system_settings (world_id, settings_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(world_id) DO UPDATE SET
                settings_json = excluded.settings_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(world_id.as_str())
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("settings", e))?;

        Ok(())
    }

    async fn delete_for_world(&self, world_id: &WorldId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM system_settings WHERE world_id = ?")
            .bind(world_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("settings", e))?;
        Ok(())
    }
}
