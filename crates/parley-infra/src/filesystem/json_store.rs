//! JSON-file document store.
//!
//! Each [`DocumentKey`] maps to `{data_dir}/{key.file_name()}`. Documents
//! are written pretty-printed, first to a sibling temp file and then
//! renamed into place, so a crash mid-write never leaves a truncated file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_core::storage::DocumentStore;
use parley_types::document::DocumentKey;
use parley_types::error::StoreError;
use tracing::{debug, info};

/// File-backed implementation of [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding a document.
    pub fn path_for(&self, key: DocumentKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Create the data directory and seed every missing document with its
    /// empty value.
    ///
    /// With `clear_on_start`, all documents are reset to empty instead.
    pub async fn initialize(&self, clear_on_start: bool) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Other(format!("failed to create {}: {e}", self.dir.display())))?;

        for key in DocumentKey::ALL {
            if clear_on_start || !self.exists(key).await? {
                self.put(key, &key.empty_value()).await?;
            }
        }

        if clear_on_start {
            info!(dir = %self.dir.display(), "Reset all documents to empty");
        } else {
            debug!(dir = %self.dir.display(), "Data directory ready");
        }
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    async fn get(&self, key: DocumentKey) -> Result<Option<serde_json::Value>, StoreError> {
        let content = match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { key, source }),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key,
                message: e.to_string(),
            })
    }

    async fn put(&self, key: DocumentKey, value: &serde_json::Value) -> Result<(), StoreError> {
        let io = |source| StoreError::Io { key, source };

        tokio::fs::create_dir_all(&self.dir).await.map_err(io)?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key.file_name()));
        let content = serde_json::to_string_pretty(value)?;

        tokio::fs::write(&tmp, content).await.map_err(io)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io)?;
        Ok(())
    }

    async fn exists(&self, key: DocumentKey) -> Result<bool, StoreError> {
        tokio::fs::try_exists(self.path_for(key))
            .await
            .map_err(|source| StoreError::Io { key, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::session::SessionService;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_initialize_creates_empty_documents() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));

        store.initialize(false).await.unwrap();

        for key in DocumentKey::ALL {
            assert!(store.path_for(key).exists(), "{key} missing");
            assert_eq!(store.get(key).await.unwrap(), Some(key.empty_value()));
        }
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_documents() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store
            .put(DocumentKey::Config, &json!({"model": "qwen-plus"}))
            .await
            .unwrap();

        store.initialize(false).await.unwrap();
        assert_eq!(
            store.get(DocumentKey::Config).await.unwrap(),
            Some(json!({"model": "qwen-plus"}))
        );
    }

    #[tokio::test]
    async fn test_initialize_with_clear_resets_documents() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store
            .put(DocumentKey::LegacyMessages, &json!([{"role": "user"}]))
            .await
            .unwrap();

        store.initialize(true).await.unwrap();
        assert_eq!(
            store.get(DocumentKey::LegacyMessages).await.unwrap(),
            Some(json!([]))
        );
    }

    #[tokio::test]
    async fn test_put_writes_pretty_json_without_temp_leftovers() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store
            .put(DocumentKey::Sessions, &json!([{"id": "s_1"}]))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path_for(DocumentKey::Sessions)).unwrap();
        assert!(raw.contains("\n  "));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.get(DocumentKey::Sessions).await.unwrap(), None);
        assert!(!store.exists(DocumentKey::Sessions).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for(DocumentKey::Sessions), "{not json").unwrap();

        let err = store.get(DocumentKey::Sessions).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key: DocumentKey::Sessions, .. }));
    }

    #[tokio::test]
    async fn test_session_service_over_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for(DocumentKey::Sessions), "garbage").unwrap();
        let svc = SessionService::new(Arc::new(store.clone()));

        assert!(svc.list().await.unwrap().is_empty());
        // List rewrites the sessions document as a valid empty array.
        assert_eq!(store.get(DocumentKey::Sessions).await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_sessions_survive_reopen() {
        let dir = tempdir().unwrap();
        let first = SessionService::new(Arc::new(JsonFileStore::new(dir.path())));
        let created = first.create(Some("Persisted".to_string())).await.unwrap();
        first
            .replace_messages(&created.id, vec![json!({"role": "user", "content": "hi"})])
            .await
            .unwrap();

        let reopened = SessionService::new(Arc::new(JsonFileStore::new(dir.path())));
        let sessions = reopened.list().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title, "Persisted");
        assert_eq!(reopened.get_messages(&created.id).await.unwrap().len(), 1);
    }
}
