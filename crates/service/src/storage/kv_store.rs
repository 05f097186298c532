use crate::errors::ServiceError;
use async_trait::async_trait;

/// Persistent string-keyed store, the shape of a browser's `localStorage`.
/// Implementations can be file-backed, in-memory, or remote KV.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Insert or overwrite `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError>;
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    /// All entries, sorted by key.
    async fn entries(&self) -> Result<Vec<(String, String)>, ServiceError>;
}
