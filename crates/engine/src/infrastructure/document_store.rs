//! World documents stored as JSON files, one file per collection.
//!
//! ```text
//! <world>/actors.json    [PersistedDocument, ...]
//! <world>/items.json
//! <world>/journal.json
//! ```
//!
//! A missing file is an empty collection. Writes rewrite the whole collection
//! through a temp file and a rename, so a crash never leaves a half-written file
//! behind. A single [`DocumentStore::save`] therefore costs a full read and
//! write of its collection; batch migrations go through
//! [`DocumentStore::save_all`], which pays that cost once per batch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mojo_domain::{DocumentId, PersistedDocument};
use tokio::sync::Mutex;

use crate::infrastructure::ports::{Collection, DocumentStore, RepoError};

pub struct JsonWorldStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles on collection files
    write_lock: Mutex<()>,
}

impl JsonWorldStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.json", collection.as_str()))
    }

    async fn read(&self, collection: Collection) -> Result<Vec<PersistedDocument>, RepoError> {
        let path = self.path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::storage("read collection", e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            RepoError::serialization(format!("{}: {e}", path.display()))
        })
    }

    async fn write(
        &self,
        collection: Collection,
        documents: &[PersistedDocument],
    ) -> Result<(), RepoError> {
        let path = self.path(collection);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(documents).map_err(RepoError::serialization)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| RepoError::storage("create world dir", e))?;
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| RepoError::storage("write collection", e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| RepoError::storage("replace collection", e))?;
        Ok(())
    }

    /// Read a collection, swap in `updates` by id, and write it back once.
    async fn replace(
        &self,
        collection: Collection,
        updates: &[PersistedDocument],
    ) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read(collection).await?;
        let index: HashMap<&DocumentId, usize> = documents
            .iter()
            .enumerate()
            .map(|(slot, stored)| (&stored.id, slot))
            .collect();
        let slots = updates
            .iter()
            .map(|update| {
                index
                    .get(&update.id)
                    .copied()
                    .ok_or_else(|| RepoError::not_found("document", &update.id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (slot, update) in slots.into_iter().zip(updates) {
            documents[slot] = update.clone();
        }
        self.write(collection, &documents).await
    }
}

#[async_trait]
impl DocumentStore for JsonWorldStore {
    async fn count(&self) -> Result<usize, RepoError> {
        let mut total = 0;
        for collection in Collection::ALL {
            total += self.read(collection).await?.len();
        }
        Ok(total)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<PersistedDocument>, RepoError> {
        self.read(collection).await
    }

    async fn save(
        &self,
        collection: Collection,
        document: &PersistedDocument,
    ) -> Result<(), RepoError> {
        self.replace(collection, std::slice::from_ref(document)).await?;

        tracing::debug!(
            collection = %collection,
            document_id = %document.id,
            "Saved document"
        );
        Ok(())
    }

    async fn save_all(
        &self,
        collection: Collection,
        documents: &[PersistedDocument],
    ) -> Result<(), RepoError> {
        if documents.is_empty() {
            return Ok(());
        }
        self.replace(collection, documents).await?;

        tracing::debug!(
            collection = %collection,
            count = documents.len(),
            "Saved documents"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seed(dir: &Path, file: &str, body: serde_json::Value) {
        tokio::fs::write(dir.join(file), body.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_files_are_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonWorldStore::new(dir.path());
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.list(Collection::Items).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn count_spans_every_collection() {
        let dir = tempfile::tempdir().unwrap();
        seed(
            dir.path(),
            "actors.json",
            json!([{"_id": "a1", "type": "npc", "system": {}}]),
        )
        .await;
        seed(
            dir.path(),
            "items.json",
            json!([
                {"_id": "i1", "type": "loot", "system": {}},
                {"_id": "i2", "type": "tool", "system": {}}
            ]),
        )
        .await;

        let store = JsonWorldStore::new(dir.path());
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn save_replaces_by_id_and_keeps_host_keys() {
        let dir = tempfile::tempdir().unwrap();
        seed(
            dir.path(),
            "items.json",
            json!([
                {"_id": "i1", "type": "loot", "system": {"weight": null}, "folder": "f9"},
                {"_id": "i2", "type": "loot", "system": {}}
            ]),
        )
        .await;
        let store = JsonWorldStore::new(dir.path());

        let mut item = store.list(Collection::Items).await.unwrap().remove(0);
        item.system = json!({"weight": 0});
        store.save(Collection::Items, &item).await.unwrap();

        let stored = store.list(Collection::Items).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].system, json!({"weight": 0}));
        assert_eq!(stored[0].extra.get("folder"), Some(&json!("f9")));
        assert!(!dir.path().join("items.json.tmp").exists());
    }

    #[tokio::test]
    async fn saving_an_unknown_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonWorldStore::new(dir.path());
        let err = store
            .save(
                Collection::Items,
                &PersistedDocument::new("ghost", "loot", json!({})),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn save_all_writes_a_batch_in_one_pass() {
        let dir = tempfile::tempdir().unwrap();
        seed(
            dir.path(),
            "actors.json",
            json!([
                {"_id": "a1", "type": "npc", "system": {}},
                {"_id": "a2", "type": "npc", "system": {}},
                {"_id": "a3", "type": "vehicle", "system": {}}
            ]),
        )
        .await;
        let store = JsonWorldStore::new(dir.path());

        let mut batch = store.list(Collection::Actors).await.unwrap();
        batch.remove(1);
        for actor in &mut batch {
            actor.system = json!({"touched": true});
        }
        store.save_all(Collection::Actors, &batch).await.unwrap();

        let stored = store.list(Collection::Actors).await.unwrap();
        assert_eq!(stored[0].system, json!({"touched": true}));
        assert_eq!(stored[1].system, json!({}));
        assert_eq!(stored[2].system, json!({"touched": true}));
    }

    #[tokio::test]
    async fn save_all_with_an_unknown_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        seed(
            dir.path(),
            "items.json",
            json!([{"_id": "i1", "type": "loot", "system": {}}]),
        )
        .await;
        let store = JsonWorldStore::new(dir.path());

        let batch = vec![
            PersistedDocument::new("i1", "loot", json!({"weight": 1})),
            PersistedDocument::new("ghost", "loot", json!({})),
        ];
        let err = store.save_all(Collection::Items, &batch).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            store.list(Collection::Items).await.unwrap()[0].system,
            json!({})
        );
    }

    #[tokio::test]
    async fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("journal.json"), "{not json")
            .await
            .unwrap();
        let store = JsonWorldStore::new(dir.path());
        assert!(matches!(
            store.list(Collection::JournalPages).await,
            Err(RepoError::Serialization(_))
        ));
    }
}
