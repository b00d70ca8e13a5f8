//! In-memory document store.
//!
//! Backs unit and HTTP tests. Also counts writes per document so tests can
//! assert which documents an operation actually persisted.

use dashmap::DashMap;
use parley_types::document::DocumentKey;
use parley_types::error::StoreError;

use super::DocumentStore;

/// `DashMap`-backed implementation of [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: DashMap<DocumentKey, serde_json::Value>,
    writes: DashMap<DocumentKey, usize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a write.
    pub fn with_document(self, key: DocumentKey, value: serde_json::Value) -> Self {
        self.documents.insert(key, value);
        self
    }

    /// Current contents of a document, if any.
    pub fn snapshot(&self, key: DocumentKey) -> Option<serde_json::Value> {
        self.documents.get(&key).map(|v| v.value().clone())
    }

    /// Number of `put` calls made for a document.
    pub fn write_count(&self, key: DocumentKey) -> usize {
        self.writes.get(&key).map(|c| *c).unwrap_or(0)
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: DocumentKey) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.snapshot(key))
    }

    async fn put(&self, key: DocumentKey, value: &serde_json::Value) -> Result<(), StoreError> {
        self.documents.insert(key, value.clone());
        *self.writes.entry(key).or_insert(0) += 1;
        Ok(())
    }

    async fn exists(&self, key: DocumentKey) -> Result<bool, StoreError> {
        Ok(self.documents.contains_key(&key))
    }
}
