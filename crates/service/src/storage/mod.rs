//! Storage abstractions for service layer
//!
//! `KeyValueStore` is the string-keyed capability the seeder writes to.
//! Backends: a JSON file (persistent) and an in-process map (tests, fakes).

pub mod kv_store;
pub mod json_map_store;
pub mod file_store;
pub mod memory;

pub use file_store::JsonFileStore;
pub use kv_store::KeyValueStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use crate::errors::ServiceError;

/// Bytes used by all entries, counting both keys and values.
pub(crate) fn usage(map: &BTreeMap<String, String>) -> u64 {
    map.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum()
}

/// Reject a write that would push the map past `quota`. Replacing a value frees its old bytes first.
pub(crate) fn check_quota(
    map: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<u64>,
) -> Result<(), ServiceError> {
    let Some(quota) = quota else { return Ok(()) };
    let current = usage(map);
    let freed = map.get(key).map(|old| (key.len() + old.len()) as u64).unwrap_or(0);
    let needed = current - freed + (key.len() + value.len()) as u64;
    if needed > quota {
        return Err(ServiceError::quota_exceeded(needed, quota));
    }
    Ok(())
}
