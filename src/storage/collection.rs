//! Typed JSON access on top of a `KeyValueStore`
//!
//! Every collection is stored as one JSON value and replaced whole on write.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::kv::KeyValueStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decode the value under `key`, if present
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corruption {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Encode `value` and replace whatever is stored under `key`
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Load a list collection; a missing key is an empty list
pub fn load_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Vec<T>> {
    Ok(load_json(store, key)?.unwrap_or_default())
}

/// Timestamp-derived id that is strictly greater than every existing id
///
/// Uses the current time in milliseconds unless an existing id is already
/// at or past it, in which case the largest id plus one is returned.
pub fn next_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    match existing.into_iter().max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}
