//! Cache entry record with TTL metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single cached value together with its insertion time and time-to-live.
///
/// Entries are serialized to JSON as `{data, stored_at, ttl_ms}` records by
/// the storage backends, so the same shape works for the in-memory map and
/// for cache files that survive a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload, opaque to the cache layer
    pub data: T,
    /// Wall-clock time of insertion
    pub stored_at: DateTime<Utc>,
    /// Time-to-live for this entry in milliseconds
    pub ttl_ms: u64,
}

impl<T> CacheEntry<T> {
    /// Creates an entry stamped with the current time.
    pub fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            stored_at: Utc::now(),
            ttl_ms: ttl.as_millis() as u64,
        }
    }

    /// An entry is expired once its age exceeds its TTL.
    ///
    /// A timestamp in the future (clock adjustment) yields a negative age and
    /// counts as fresh.
    pub fn is_expired(&self) -> bool {
        let age_ms = Utc::now()
            .signed_duration_since(self.stored_at)
            .num_milliseconds();
        age_ms > self.ttl_ms as i64
    }
}
