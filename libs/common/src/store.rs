//! Key-value store abstraction
//!
//! The dashboard persists its session and a handful of record collections
//! as string values under fixed keys. Every back end implements
//! [`KeyValueStore`] so callers never depend on where the values live.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreResult;

/// String-keyed store holding string values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Set a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a key
    ///
    /// Deleting a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// In-process store backed by a map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with the given entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() -> StoreResult<()> {
        let store = MemoryStore::new();

        store.set("test_key", "test_value").await?;
        assert_eq!(store.get("test_key").await?, Some("test_value".to_string()));

        store.set("test_key", "other").await?;
        assert_eq!(store.get("test_key").await?, Some("other".to_string()));

        store.delete("test_key").await?;
        assert_eq!(store.get("test_key").await?, None);
        assert!(store.is_empty().await);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_key() -> StoreResult<()> {
        let store = MemoryStore::with_entries([("a", "1")]);
        store.delete("missing").await?;
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() -> StoreResult<()> {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        assert_eq!(store.get("anything").await?, None);
        Ok(())
    }
}
