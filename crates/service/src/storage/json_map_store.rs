use std::{collections::BTreeMap, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed map store.
///
/// The file is the only copy of the map: every read loads it and every
/// mutation is applied to what is currently on disk, so several handles (or
/// processes) on one path see each other's writes. The whole file is
/// rewritten on every mutation, with keys in sorted order.
pub struct JsonMapStore<K, V> {
    // 串行化本进程内的读写；跨进程仍是最后写入者生效
    lock: RwLock<()>,
    file_path: PathBuf,
    _entries: std::marker::PhantomData<fn() -> (K, V)>,
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> ServiceError {
    ServiceError::StorageUnavailable(format!("{}: {e}", path.display()))
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`. Creates the file with an empty map if missing;
    /// an unreadable or corrupt file is reported rather than replaced.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| unavailable(parent, e))?;
            }
        }

        let store = Self { lock: RwLock::new(()), file_path, _entries: std::marker::PhantomData };
        match fs::metadata(&store.file_path).await {
            Ok(_) => {
                store.load().await?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                store.save(&BTreeMap::new()).await?;
            }
            Err(e) => return Err(unavailable(&store.file_path, e)),
        }

        debug!(path = %store.file_path.display(), "json map store opened");
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the map from disk. A file removed after `open` reads as empty.
    async fn load(&self) -> Result<BTreeMap<K, V>, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| unavailable(&self.file_path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(unavailable(&self.file_path, e)),
        }
    }

    async fn save(&self, map: &BTreeMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(|e| unavailable(&self.file_path, e))?;
        fs::write(&self.file_path, data).await.map_err(|e| unavailable(&self.file_path, e))?;
        Ok(())
    }

    /// List all entries as `(key, value)` pairs in key order.
    pub async fn list(&self) -> Result<Vec<(K, V)>, ServiceError> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.into_iter().collect())
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Result<Option<V>, ServiceError> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.remove(key))
    }

    /// Apply a mutation to the map currently on disk and persist it. Nothing
    /// is written if the mutation fails.
    pub async fn update_map<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<(), ServiceError>,
    {
        let _guard = self.lock.write().await;
        let mut map = self.load().await?;
        f(&mut map)?;
        self.save(&map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()))
    }

    async fn put(store: &JsonMapStore<String, String>, key: &str, value: &str) -> Result<(), ServiceError> {
        store
            .update_map(|m| {
                m.insert(key.to_string(), value.to_string());
                Ok(())
            })
            .await
    }

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonMapStore::<String, String>::open(&tmp).await?;

        // initially empty
        assert_eq!(store.list().await?.len(), 0);

        put(&store, "b", "2").await?;
        put(&store, "a", "1").await?;
        assert_eq!(store.get(&"a".into()).await?.as_deref(), Some("1"));

        // update_map
        store
            .update_map(|m| {
                if let Some(v) = m.get_mut("a") { *v = "10".into(); }
                Ok(())
            })
            .await?;
        assert_eq!(store.get(&"a".into()).await?.as_deref(), Some("10"));

        // 重新打开，验证落盘且按键排序
        let reloaded = JsonMapStore::<String, String>::open(&tmp).await?;
        let entries = reloaded.list().await?;
        assert_eq!(entries, vec![("a".to_string(), "10".to_string()), ("b".to_string(), "2".to_string())]);
        assert_eq!(tokio::fs::read_to_string(&tmp).await?, r#"{"a":"10","b":"2"}"#);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn handles_on_one_path_share_writes() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let first = JsonMapStore::<String, String>::open(&tmp).await?;
        let second = JsonMapStore::<String, String>::open(&tmp).await?;

        put(&first, "a", "1").await?;
        assert_eq!(second.get(&"a".into()).await?.as_deref(), Some("1"));

        // 第二个句柄写入时不能覆盖第一个句柄的数据
        put(&second, "b", "2").await?;
        assert_eq!(first.list().await?.len(), 2);
        assert_eq!(tokio::fs::read_to_string(&tmp).await?, r#"{"a":"1","b":"2"}"#);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        put(&store, "a", "1").await?;

        let res = store
            .update_map(|m| {
                m.insert("a".into(), "changed".into());
                Err(ServiceError::Validation("rejected".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.get(&"a".into()).await?.as_deref(), Some("1"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_unavailable() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"{not json").await?;

        let res = JsonMapStore::<String, String>::open(&tmp).await;
        assert!(matches!(res, Err(ServiceError::StorageUnavailable(_))));
        // 损坏的文件不能被覆盖
        assert_eq!(tokio::fs::read(&tmp).await?, b"{not json");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
