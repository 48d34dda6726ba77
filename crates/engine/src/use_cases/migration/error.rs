use crate::infrastructure::ports::RepoError;
use crate::use_cases::settings::SettingsError;

/// Failures that stop a world migration as a whole.
///
/// Problems with a single document never end up here; they are counted in the
/// report and the batch moves on.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}
