use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::storage::{check_quota, kv_store::KeyValueStore};

/// In-process store; contents are lost when dropped.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: u64) -> Self {
        Self { inner: RwLock::default(), quota: Some(quota) }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        check_quota(&map, key, value, self.quota)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn entries(&self) -> Result<Vec<(String, String)>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_overwrites() -> Result<(), ServiceError> {
        let store = MemoryStore::new();
        store.set("a", "1").await?;
        store.set("a", "2").await?;
        assert_eq!(store.get("a").await?.as_deref(), Some("2"));
        assert_eq!(store.entries().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn memory_store_quota() -> Result<(), ServiceError> {
        let store = MemoryStore::with_quota(4);
        store.set("ab", "cd").await?;
        assert!(store.set("e", "f").await.is_err());
        assert_eq!(store.get("e").await?, None);
        Ok(())
    }
}
