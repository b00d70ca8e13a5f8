//! Client settings document passthrough.
//!
//! The config document belongs to the client; the server stores it as an
//! opaque JSON value and never interprets it.

use std::sync::Arc;

use parley_types::document::DocumentKey;
use parley_types::error::StoreError;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::storage::{load_or_default, DocumentStore};

/// Reads and overwrites the config document.
pub struct ConfigService<D: DocumentStore> {
    store: Arc<D>,
    guard: Mutex<()>,
}

impl<D: DocumentStore> ConfigService<D> {
    pub fn new(store: Arc<D>) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    /// The stored config, or `{}` when there is none.
    pub async fn get_config(&self) -> Result<Value, StoreError> {
        let _guard = self.guard.lock().await;
        let config: Option<Value> = load_or_default(&*self.store, DocumentKey::Config).await?;
        Ok(config.unwrap_or_else(|| DocumentKey::Config.empty_value()))
    }

    /// Overwrite the config verbatim.
    pub async fn put_config(&self, config: &Value) -> Result<(), StoreError> {
        let _guard = self.guard.lock().await;
        self.store.put(DocumentKey::Config, config).await?;
        debug!("Config document replaced");
        Ok(())
    }
}
