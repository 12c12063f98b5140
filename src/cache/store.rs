//! Bounded TTL cache over a swappable storage backend
//!
//! The store keeps JSON-encoded [`CacheEntry`] records behind a
//! [`CacheStorage`] backend, expires them lazily on read, and enforces a soft
//! capacity bound by evicting the oldest entries before inserting. Storage
//! failures are logged and absorbed: callers always see a plain miss or a
//! completed no-op, never an error.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::entry::CacheEntry;
use super::storage::{CacheStorage, MemoryStorage};

/// Namespace prefix applied to every key before it reaches the backend
pub const KEY_PREFIX: &str = "sw-cache:";

/// TTL-aware key-value store with oldest-first eviction.
pub struct CacheStore {
    storage: Box<dyn CacheStorage>,
    default_ttl: Duration,
    max_entries: usize,
}

impl CacheStore {
    /// Creates a store over the given backend.
    ///
    /// # Arguments
    /// * `storage` - Backend holding the serialized entries
    /// * `default_ttl` - TTL applied when `set` is called without one
    /// * `max_entries` - Soft capacity bound enforced on insertion
    pub fn new(storage: Box<dyn CacheStorage>, default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            storage,
            default_ttl,
            max_entries,
        }
    }

    /// Convenience constructor for a volatile in-memory store
    pub fn in_memory(default_ttl: Duration, max_entries: usize) -> Self {
        Self::new(Box::new(MemoryStorage::new()), default_ttl, max_entries)
    }

    /// Retrieves a value by key.
    ///
    /// Returns `None` when the key is absent, unreadable, or expired; expired
    /// and unreadable entries are deleted on the way out.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = match self.storage.read(&prefixed(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, error = %err, "dropping unreadable cache entry");
                self.delete(key);
                return None;
            }
        };

        if entry.is_expired() {
            debug!(key, "cache entry expired");
            self.delete(key);
            return None;
        }

        Some(entry.data)
    }

    /// Inserts or overwrites a value.
    ///
    /// When the store is at capacity, the oldest tenth of the entries
    /// (at least one) is evicted first. Storage failures are logged and the
    /// entry is dropped; the call itself always succeeds.
    ///
    /// # Arguments
    /// * `ttl` - Per-entry TTL; falls back to the store default when `None`
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T, ttl: Option<Duration>) {
        if self.len() >= self.max_entries {
            self.evict_oldest();
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "cache entry not serializable, skipping");
                return;
            }
        };

        if let Err(err) = self.storage.write(&prefixed(key), &raw) {
            warn!(key, error = %err, "cache write failed, entry dropped");
        }
    }

    /// Returns whether the key holds a live entry.
    ///
    /// Shares `get`'s expiry behavior: probing an expired entry deletes it.
    pub fn has(&mut self, key: &str) -> bool {
        self.get::<serde_json::Value>(key).is_some()
    }

    /// Removes an entry; removing an absent key is a no-op.
    pub fn delete(&mut self, key: &str) {
        if let Err(err) = self.storage.remove(&prefixed(key)) {
            warn!(key, error = %err, "cache delete failed");
        }
    }

    /// Removes every entry in this store's namespace.
    pub fn clear(&mut self) {
        for key in self.namespace_keys() {
            if let Err(err) = self.storage.remove(&key) {
                warn!(key = key.as_str(), error = %err, "cache clear failed for entry");
            }
        }
    }

    /// Changes the default TTL for future `set` calls.
    ///
    /// Existing entries keep the TTL they were stored with.
    pub fn set_default_ttl(&mut self, ttl: Duration) {
        self.default_ttl = ttl;
    }

    /// Number of entries currently stored (live or not yet expired-on-read)
    pub fn len(&self) -> usize {
        self.namespace_keys().len()
    }

    /// Returns true when the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lists the backend keys belonging to this store's namespace
    fn namespace_keys(&self) -> Vec<String> {
        match self.storage.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|key| key.starts_with(KEY_PREFIX))
                .collect(),
            Err(err) => {
                warn!(error = %err, "cache key listing failed");
                Vec::new()
            }
        }
    }

    /// Evicts the oldest `max(1, max_entries / 10)` entries by insertion time.
    ///
    /// Unreadable entries sort before everything else so they are reclaimed
    /// first; timestamp ties fall back to a stable arbitrary order.
    fn evict_oldest(&mut self) {
        let count = (self.max_entries / 10).max(1);

        let mut stamped: Vec<(String, DateTime<Utc>)> = self
            .namespace_keys()
            .into_iter()
            .map(|key| {
                let stored_at = self
                    .storage
                    .read(&key)
                    .ok()
                    .flatten()
                    .and_then(|raw| serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw).ok())
                    .map(|entry| entry.stored_at)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                (key, stored_at)
            })
            .collect();

        stamped.sort_by_key(|(_, stored_at)| *stored_at);

        for (key, _) in stamped.into_iter().take(count) {
            debug!(key = key.as_str(), "evicting cache entry");
            if let Err(err) = self.storage.remove(&key) {
                warn!(key = key.as_str(), error = %err, "cache eviction failed for entry");
            }
        }
    }
}

fn prefixed(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::storage::FileStorage;
    use serde::Deserialize;
    use std::thread::sleep;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        value: i32,
    }

    fn payload(value: i32) -> Payload {
        Payload {
            name: format!("item-{value}"),
            value,
        }
    }

    fn test_store(max_entries: usize) -> CacheStore {
        CacheStore::in_memory(Duration::from_secs(300), max_entries)
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut store = test_store(100);

        store.set("key1", &payload(1), None);
        assert_eq!(store.get::<Payload>("key1"), Some(payload(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let mut store = test_store(100);
        assert_eq!(store.get::<Payload>("nope"), None);
    }

    #[test]
    fn test_expired_entry_is_deleted_on_read() {
        let mut store = test_store(100);

        store.set("key1", &payload(1), Some(Duration::from_millis(30)));
        assert!(store.has("key1"));

        sleep(Duration::from_millis(60));
        assert_eq!(store.get::<Payload>("key1"), None);
        assert!(store.is_empty(), "Expired entry should be purged");
    }

    #[test]
    fn test_per_entry_ttl_overrides_default() {
        let mut store = CacheStore::in_memory(Duration::from_millis(20), 100);

        store.set("short", &payload(1), None);
        store.set("long", &payload(2), Some(Duration::from_secs(60)));

        sleep(Duration::from_millis(50));
        assert_eq!(store.get::<Payload>("short"), None);
        assert_eq!(store.get::<Payload>("long"), Some(payload(2)));
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut store = test_store(100);

        store.set("key1", &payload(1), None);
        store.set("key1", &payload(2), None);

        assert_eq!(store.get::<Payload>("key1"), Some(payload(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = test_store(100);

        store.set("key1", &payload(1), None);
        store.delete("key1");
        store.delete("key1");

        assert_eq!(store.get::<Payload>("key1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut store = test_store(100);

        store.set("a", &payload(1), None);
        store.set("b", &payload(2), None);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get::<Payload>("a"), None);
    }

    #[test]
    fn test_default_ttl_change_only_affects_future_sets() {
        let mut store = CacheStore::in_memory(Duration::from_secs(60), 100);

        store.set("old", &payload(1), None);
        store.set_default_ttl(Duration::ZERO);
        store.set("new", &payload(2), None);

        sleep(Duration::from_millis(5));
        assert_eq!(store.get::<Payload>("old"), Some(payload(1)));
        assert_eq!(store.get::<Payload>("new"), None);
    }

    #[test]
    fn test_capacity_evicts_single_oldest_entry() {
        let mut store = test_store(10);

        for i in 0..10 {
            store.set(&format!("key{i}"), &payload(i), None);
            // Distinct stored_at stamps so eviction order is deterministic
            sleep(Duration::from_millis(3));
        }
        assert_eq!(store.len(), 10);

        store.set("key10", &payload(10), None);

        assert_eq!(store.len(), 10);
        assert_eq!(store.get::<Payload>("key0"), None, "Oldest entry evicted");
        assert_eq!(store.get::<Payload>("key1"), Some(payload(1)));
        assert_eq!(store.get::<Payload>("key10"), Some(payload(10)));
    }

    #[test]
    fn test_capacity_evicts_ten_percent_when_larger() {
        let mut store = test_store(30);

        for i in 0..30 {
            store.set(&format!("key{i}"), &payload(i), None);
            sleep(Duration::from_millis(2));
        }

        store.set("extra", &payload(99), None);

        // 30 entries - 3 evicted + 1 inserted
        assert_eq!(store.len(), 28);
        for i in 0..3 {
            assert_eq!(store.get::<Payload>(&format!("key{i}")), None);
        }
        assert_eq!(store.get::<Payload>("key3"), Some(payload(3)));
        assert_eq!(store.get::<Payload>("extra"), Some(payload(99)));
    }

    #[test]
    fn test_file_backed_store_survives_rebuild() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let mut store = CacheStore::new(
            Box::new(FileStorage::new(temp_dir.path().to_path_buf())),
            Duration::from_secs(300),
            100,
        );
        store.set("endpoint:vehicles:page:1:limit:20", &payload(7), None);

        let mut reopened = CacheStore::new(
            Box::new(FileStorage::new(temp_dir.path().to_path_buf())),
            Duration::from_secs(300),
            100,
        );
        assert_eq!(
            reopened.get::<Payload>("endpoint:vehicles:page:1:limit:20"),
            Some(payload(7))
        );
    }

    #[test]
    fn test_corrupt_entry_degrades_to_miss() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut backend = FileStorage::new(temp_dir.path().to_path_buf());
        backend
            .write(&prefixed("broken"), "this is not json")
            .unwrap();

        let mut store = CacheStore::new(Box::new(backend), Duration::from_secs(300), 100);

        assert_eq!(store.get::<Payload>("broken"), None);
        assert!(store.is_empty(), "Corrupt entry should be removed");
    }
}
