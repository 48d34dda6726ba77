use async_trait::async_trait;
use mojo_domain::{DocumentKind, PersistedDocument, SystemSettings, WorldId};

use super::error::RepoError;

// =============================================================================
// World Documents
// =============================================================================

/// Top-level document collections of a world, in migration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Actors,
    Items,
    JournalPages,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Actors,
        Collection::Items,
        Collection::JournalPages,
    ];

    pub fn kind(&self) -> DocumentKind {
        match self {
            Collection::Actors => DocumentKind::Actor,
            Collection::Items => DocumentKind::Item,
            Collection::JournalPages => DocumentKind::JournalEntryPage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Actors => "actors",
            Collection::Items => "items",
            Collection::JournalPages => "journal",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host persistence for a world's documents. Each write is atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Number of top-level documents across every collection.
    async fn count(&self) -> Result<usize, RepoError>;
    async fn list(&self, collection: Collection) -> Result<Vec<PersistedDocument>, RepoError>;
    /// Replace a stored document (matched by id) with `document`.
    async fn save(
        &self,
        collection: Collection,
        document: &PersistedDocument,
    ) -> Result<(), RepoError>;
    /// Replace several stored documents of one collection in a single write.
    /// Either all of them are replaced or none are.
    async fn save_all(
        &self,
        collection: Collection,
        documents: &[PersistedDocument],
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Settings Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get_for_world(&self, world_id: &WorldId) -> Result<Option<SystemSettings>, RepoError>;
    async fn save_for_world(
        &self,
        world_id: &WorldId,
        settings: &SystemSettings,
    ) -> Result<(), RepoError>;
    async fn delete_for_world(&self, world_id: &WorldId) -> Result<(), RepoError>;
}
