//! Expiring key/value cache over a `Store`
//!
//! Provides a `CacheManager` that stamps every write with an expiry derived
//! from the collection's TTL. Expired entries are never returned: reads delete
//! them lazily and `cleanup` sweeps them eagerly. Storage failures are logged
//! and treated as misses, so callers can always fall back to the network.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::clock::{Clock, SystemClock};
use super::store::{CacheEntry, Store};
use super::Collection;
use crate::config::{minutes_to_ms, CacheSettings};

/// Minimum minutes between sweeps triggered by writes
pub const CLEANUP_DEBOUNCE_MINUTES: i64 = 5;

/// Size information for one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Entries currently stored, expired ones included
    pub count: usize,
    /// Rough payload size: serialized JSON length times two (UTF-16 estimate)
    pub approx_bytes: u64,
}

/// TTL-bounded cache partitioned into collections
///
/// Construct one per process and share it by `Arc`.
pub struct CacheManager {
    store: Arc<dyn Store>,
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
    /// When the last sweep started
    last_cleanup: Mutex<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    /// Creates a cache using wall-clock time and sweeps expired entries
    pub fn new(store: Arc<dyn Store>, settings: CacheSettings) -> Self {
        Self::with_clock(store, settings, Arc::new(SystemClock))
    }

    /// Creates a cache with a custom clock and sweeps expired entries
    pub fn with_clock(store: Arc<dyn Store>, settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let manager = Self {
            store,
            settings,
            clock,
            last_cleanup: Mutex::new(None),
        };
        manager.cleanup();
        manager
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Writes a value, replacing any existing entry under the same key
    ///
    /// # Arguments
    /// * `collection` - Partition to write into
    /// * `key` - Key unique within the collection
    /// * `data` - The value to cache
    /// * `ttl_minutes` - Overrides the collection's default TTL when set
    ///
    /// # Returns
    /// `true` if the entry was stored. Failures are logged, never raised.
    pub fn set<T: Serialize>(
        &self,
        collection: Collection,
        key: &str,
        data: &T,
        ttl_minutes: Option<u64>,
    ) -> bool {
        let config = self.settings.for_collection(collection);
        let ttl = ttl_minutes.unwrap_or(config.ttl_minutes);

        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(%collection, key, error = %e, "failed to serialize cache item");
                return false;
            }
        };

        let now = self.clock.now();
        let entry = CacheEntry {
            key: key.to_string(),
            data,
            written_at: now,
            expires_at: expiry_after(now, ttl),
            collection,
        };

        if let Err(e) = self.store.put(&entry) {
            tracing::warn!(%collection, key, error = %e, "failed to cache item");
            return false;
        }
        tracing::debug!(%collection, key, ttl_minutes = ttl, "cached item");

        if config.auto_cleanup {
            self.schedule_cleanup(now);
        }
        true
    }

    /// Reads a live value
    ///
    /// Returns `None` when the key is missing, expired, unreadable, or does not
    /// decode as `T`. An expired entry is deleted as a side effect.
    pub fn get<T: DeserializeOwned>(&self, collection: Collection, key: &str) -> Option<T> {
        let entry = match self.store.get(collection, key) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%collection, key, error = %e, "failed to read cached item");
                return None;
            }
        };

        if !entry.is_live_at(self.clock.now()) {
            tracing::debug!(%collection, key, "cached item expired");
            self.remove(collection, key);
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(%collection, key, error = %e, "cached item has unexpected shape");
                None
            }
        }
    }

    /// Deletes one entry; removing a missing key is a no-op
    pub fn remove(&self, collection: Collection, key: &str) {
        if let Err(e) = self.store.delete(collection, key) {
            tracing::warn!(%collection, key, error = %e, "failed to delete cached item");
        }
    }

    /// Deletes every entry in a collection
    pub fn clear(&self, collection: Collection) {
        match self.store.clear(collection) {
            Ok(()) => tracing::debug!(%collection, "cleared collection"),
            Err(e) => tracing::warn!(%collection, error = %e, "failed to clear collection"),
        }
    }

    /// Deletes every entry with `expires_at <= now` across all collections
    ///
    /// Returns how many entries this call removed. Entries already deleted by a
    /// concurrent sweep are not counted.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        *self.last_cleanup.lock().unwrap_or_else(PoisonError::into_inner) = Some(now);

        let mut total_deleted = 0;
        for collection in Collection::ALL {
            let entries = match self.store.entries(collection) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(%collection, error = %e, "failed to scan collection for cleanup");
                    continue;
                }
            };

            for entry in entries.iter().filter(|entry| !entry.is_live_at(now)) {
                match self.store.delete(collection, &entry.key) {
                    Ok(true) => total_deleted += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(%collection, key = %entry.key, error = %e, "failed to delete expired item");
                    }
                }
            }
        }

        tracing::info!(deleted = total_deleted, "cleaned up expired cache items");
        total_deleted
    }

    /// Per-collection entry counts and estimated sizes
    ///
    /// Expired entries still on storage are counted; nothing is evicted here.
    pub fn stats(&self) -> BTreeMap<Collection, CollectionStats> {
        let mut stats = BTreeMap::new();
        for collection in Collection::ALL {
            let entries = match self.store.entries(collection) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(%collection, error = %e, "failed to read collection stats");
                    Vec::new()
                }
            };

            let approx_bytes = entries.iter().map(approx_entry_size).sum();
            let threshold = self
                .settings
                .for_collection(collection)
                .storage_warning_threshold_bytes();
            if approx_bytes > threshold {
                tracing::warn!(%collection, approx_bytes, threshold, "collection exceeds storage warning threshold");
            }

            stats.insert(
                collection,
                CollectionStats {
                    count: entries.len(),
                    approx_bytes,
                },
            );
        }
        stats
    }

    /// Runs a sweep if the last one started at least `CLEANUP_DEBOUNCE_MINUTES` ago
    fn schedule_cleanup(&self, now: DateTime<Utc>) {
        let debounce = Duration::minutes(CLEANUP_DEBOUNCE_MINUTES);
        let due = self
            .last_cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map_or(true, |last| now - last >= debounce);
        if due {
            self.cleanup();
        }
    }
}

/// Expiry `ttl_minutes` after `now`, saturating at the latest representable instant
fn expiry_after(now: DateTime<Utc>, ttl_minutes: u64) -> DateTime<Utc> {
    minutes_to_ms(ttl_minutes)
        .and_then(|ms| i64::try_from(ms).ok())
        .and_then(Duration::try_milliseconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn approx_entry_size(entry: &CacheEntry) -> u64 {
    serde_json::to_string(entry).map_or(0, |json| json.len() as u64 * 2)
}
