use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::KvStore;

/// Process-local key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());

        tracing::debug!("Stored value for key: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.entries.read().await.get(key).cloned();

        tracing::debug!("Read key: {} (found: {})", key, value.is_some());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("hello").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new();
        store.put("hello", "world").await.unwrap();
        assert_eq!(store.get("hello").await.unwrap(), Some("world".to_string()));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("hello", "there").await.unwrap();
        store.put("hello", "world").await.unwrap();

        assert_eq!(store.get("hello").await.unwrap(), Some("world".to_string()));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.put("a", "1").await.unwrap();
        store.put("b", "2").await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
        assert_eq!(store.get("c").await.unwrap(), None);
    }
}
