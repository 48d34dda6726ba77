//! World-scoped system settings use cases.
//!
//! A world without stored settings reads as the defaults: strict validation,
//! never migrated.

use std::sync::Arc;

use mojo_domain::{SystemSettings, SystemVersion, WorldId};

use crate::infrastructure::ports::SettingsRepo;

/// Settings operations use case.
pub struct SettingsOps {
    repo: Arc<dyn SettingsRepo>,
}

impl SettingsOps {
    pub fn new(repo: Arc<dyn SettingsRepo>) -> Self {
        Self { repo }
    }

    /// Get settings for a specific world, falling back to defaults.
    pub async fn get_for_world(&self, world_id: &WorldId) -> Result<SystemSettings, SettingsError> {
        let settings = self
            .repo
            .get_for_world(world_id)
            .await?
            .unwrap_or_else(|| SystemSettings::for_world(world_id.clone()));
        Ok(SystemSettings {
            world_id: Some(world_id.clone()),
            ..settings
        })
    }

    /// Update settings for a specific world.
    ///
    /// Sets the world_id to ensure settings are associated with the correct world.
    pub async fn update_for_world(
        &self,
        world_id: &WorldId,
        settings: SystemSettings,
    ) -> Result<SystemSettings, SettingsError> {
        let settings = SystemSettings {
            world_id: Some(world_id.clone()),
            ..settings
        };
        self.repo.save_for_world(world_id, &settings).await?;
        Ok(settings)
    }

    /// Switch strict validation on or off.
    pub async fn set_strict_validation(
        &self,
        world_id: &WorldId,
        strict: bool,
    ) -> Result<SystemSettings, SettingsError> {
        let mut settings = self.get_for_world(world_id).await?;
        if settings.strict_validation == strict {
            return Ok(settings);
        }
        settings.strict_validation = strict;
        tracing::info!(world_id = %world_id, strict, "Changed validation strictness");
        self.update_for_world(world_id, settings).await
    }

    /// Remember that the world has been migrated to `version`.
    pub async fn record_migration(
        &self,
        world_id: &WorldId,
        version: &SystemVersion,
    ) -> Result<SystemSettings, SettingsError> {
        let mut settings = self.get_for_world(world_id).await?;
        settings.record_migration(version);
        self.update_for_world(world_id, settings).await
    }

    /// Delete stored settings; later reads return the defaults.
    pub async fn reset_for_world(&self, world_id: &WorldId) -> Result<SystemSettings, SettingsError> {
        self.repo.delete_for_world(world_id).await?;
        self.get_for_world(world_id).await
    }
}

/// Errors that can occur during settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Repository error: {0}")]
    Repo(#[from] crate::infrastructure::ports::RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockSettingsRepo, RepoError};

    fn world() -> WorldId {
        WorldId::new("w1")
    }

    #[tokio::test]
    async fn missing_settings_read_as_defaults() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get_for_world().returning(|_| Ok(None));

        let ops = SettingsOps::new(Arc::new(repo));
        let settings = ops.get_for_world(&world()).await.unwrap();

        assert!(settings.strict_validation);
        assert_eq!(settings.world_id, Some(world()));
        assert_eq!(settings.migration_version(), None);
    }

    #[tokio::test]
    async fn set_strict_validation_skips_save_when_unchanged() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get_for_world().returning(|_| Ok(None));
        repo.expect_save_for_world().never();

        let ops = SettingsOps::new(Arc::new(repo));
        let settings = ops.set_strict_validation(&world(), true).await.unwrap();
        assert!(settings.strict_validation);
    }

    #[tokio::test]
    async fn set_strict_validation_persists_change() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get_for_world().returning(|_| Ok(None));
        repo.expect_save_for_world()
            .withf(|id, settings| id.as_str() == "w1" && !settings.strict_validation)
            .times(1)
            .returning(|_, _| Ok(()));

        let ops = SettingsOps::new(Arc::new(repo));
        let settings = ops.set_strict_validation(&world(), false).await.unwrap();
        assert!(!settings.strict_validation);
    }

    #[tokio::test]
    async fn record_migration_keeps_other_settings() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get_for_world().returning(|_| {
            let mut stored = SystemSettings::default();
            stored.strict_validation = false;
            Ok(Some(stored))
        });
        repo.expect_save_for_world()
            .withf(|_, settings| {
                settings.system_migration_version == "2.1.0" && !settings.strict_validation
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let ops = SettingsOps::new(Arc::new(repo));
        let version = SystemVersion::parse("2.1.0").unwrap();
        ops.record_migration(&world(), &version).await.unwrap();
    }

    #[tokio::test]
    async fn repo_errors_propagate() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get_for_world()
            .returning(|_| Err(RepoError::database("settings", "locked")));

        let ops = SettingsOps::new(Arc::new(repo));
        assert!(matches!(
            ops.get_for_world(&world()).await,
            Err(SettingsError::Repo(_))
        ));
    }
}
