//! User-facing notifications. The engine produces content and severity; the
//! host decides how to display them.

use serde::{Deserialize, Serialize};

use crate::version::SystemVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// Stays on screen until dismissed
    #[serde(default)]
    pub permanent: bool,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            permanent: false,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            permanent: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            permanent: false,
        }
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    pub fn migration_begin(version: &SystemVersion) -> Self {
        Self::info(format!(
            "Applying system migration for version {version}. Please be patient and do not close your game or shut down your server."
        ))
        .permanent()
    }

    pub fn migration_complete(version: &SystemVersion) -> Self {
        Self::info(format!("System migration to version {version} completed!")).permanent()
    }

    pub fn version_too_old() -> Self {
        Self::error(
            "Your world data is from a system version too old to be reliably migrated to the latest version. \
             The process will be attempted, but errors may occur.",
        )
        .permanent()
    }

    pub fn strictness_downgraded(invalid: usize) -> Self {
        Self::warning(format!(
            "{invalid} document(s) failed validation. Strict validation has been disabled for this world; \
             reload to continue with permissive validation."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_old_is_a_permanent_error() {
        let note = Notification::version_too_old();
        assert_eq!(note.severity, Severity::Error);
        assert!(note.permanent);
    }

    #[test]
    fn downgrade_is_a_transient_warning() {
        let note = Notification::strictness_downgraded(2);
        assert_eq!(note.severity, Severity::Warning);
        assert!(!note.permanent);
        assert!(note.message.starts_with("2 document(s)"));
    }
}
