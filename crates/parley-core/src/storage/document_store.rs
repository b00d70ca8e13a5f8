//! Document store trait.
//!
//! A durable mapping from a [`DocumentKey`] to one JSON document. Every
//! write is a full overwrite; there are no partial or delta writes.

use parley_types::document::DocumentKey;
use parley_types::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Trait for whole-document persistent storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in parley-infra (files) and [`super::memory`].
pub trait DocumentStore: Send + Sync {
    /// Read a document. Returns None if it does not exist.
    fn get(
        &self,
        key: DocumentKey,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StoreError>> + Send;

    /// Overwrite a document.
    fn put(
        &self,
        key: DocumentKey,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Check whether a document exists.
    fn exists(
        &self,
        key: DocumentKey,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;
}

/// Read a document and decode it, falling back to `T::default()`.
///
/// Absent documents, documents that are not valid JSON, and documents
/// whose shape does not match `T` all yield the default. I/O failures
/// other than absence are still returned.
pub async fn load_or_default<S, T>(store: &S, key: DocumentKey) -> Result<T, StoreError>
where
    S: DocumentStore,
    T: DeserializeOwned + Default,
{
    let value = match store.get(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(T::default()),
        Err(StoreError::Corrupt { key, message }) => {
            warn!(document = %key, error = %message, "Unreadable document, using empty default");
            return Ok(T::default());
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Ok(decoded),
        Err(e) => {
            warn!(document = %key, error = %e, "Unexpected document shape, using empty default");
            Ok(T::default())
        }
    }
}

/// Encode and overwrite a document.
pub async fn save<S, T>(store: &S, key: DocumentKey, value: &T) -> Result<(), StoreError>
where
    S: DocumentStore,
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.put(key, &value).await
}
