//! Durable key/value storage for client session state
//!
//! The session lives in a handful of string entries under well-known keys.
//! Backends implement [`SessionStorage`]; multi-entry writes and removals are
//! applied as one operation so related entries never diverge.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    cache::{RedisConfig, RedisStorage},
    error::StorageResult,
    file::FileStorage,
    settings::{Settings, StorageKind},
};

/// Key/value storage backing the client session
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write all entries in a single operation
    async fn set_entries(&self, entries: &[(&str, &str)]) -> StorageResult<()>;

    /// Remove all keys in a single operation
    async fn remove_entries(&self, keys: &[&str]) -> StorageResult<()>;

    /// Set a single key
    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_entries(&[(key, value)]).await
    }

    /// Remove a single key
    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.remove_entries(&[key]).await
    }
}

/// In-memory storage, used by tests and by the `memory` storage setting
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no entry is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_entries(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let mut map = self.entries.lock().await;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn remove_entries(&self, keys: &[&str]) -> StorageResult<()> {
        let mut map = self.entries.lock().await;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Open the storage backend selected in the settings
pub async fn open_storage(settings: &Settings) -> StorageResult<Arc<dyn SessionStorage>> {
    let storage: Arc<dyn SessionStorage> = match settings.storage {
        StorageKind::Memory => {
            info!("Using in-memory session storage");
            Arc::new(MemoryStorage::new())
        }
        StorageKind::File => {
            info!("Using file session storage at {}", settings.storage_path.display());
            Arc::new(FileStorage::new(settings.storage_path.clone()))
        }
        StorageKind::Redis => {
            let config = RedisConfig {
                url: settings.redis_url.clone(),
                key_prefix: settings.redis_key_prefix.clone(),
            };
            Arc::new(RedisStorage::new(&config).await?)
        }
    };

    Ok(storage)
}
