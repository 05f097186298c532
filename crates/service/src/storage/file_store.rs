use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::{check_quota, json_map_store::JsonMapStore, kv_store::KeyValueStore};

/// File-backed key-value store. Keeps a map of `key -> value` persisted as a
/// single JSON object, optionally bounded by a byte quota.
#[derive(Clone)]
pub struct JsonFileStore {
    store: Arc<JsonMapStore<String, String>>,
    quota: Option<u64>,
}

impl JsonFileStore {
    /// Open the store from the given file path. Creates the file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        Self::open_with_quota(path, None).await
    }

    pub async fn open_with_quota<P: Into<PathBuf>>(
        path: P,
        quota: Option<u64>,
    ) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, String>::open(path).await?;
        Ok(Arc::new(Self { store, quota }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let quota = self.quota;
        self.store
            .update_map(|m| {
                check_quota(m, key, value, quota)?;
                m.insert(key.to_string(), value.to_string());
                Ok(())
            })
            .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        self.store.get(&key.to_string()).await
    }

    async fn entries(&self) -> Result<Vec<(String, String)>, ServiceError> {
        self.store.list().await
    }
}
