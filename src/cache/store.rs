//! Storage primitive underneath the expiring cache
//!
//! A `Store` holds complete `CacheEntry` records keyed by `(collection, key)`.
//! It knows nothing about expiry; TTL rules live in `CacheManager`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use super::Collection;

/// A persisted cache record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Key, unique within its collection
    pub key: String,
    /// The cached payload
    pub data: serde_json::Value,
    /// When the entry was written (ms since epoch on disk)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub written_at: DateTime<Utc>,
    /// When the entry stops being live (ms since epoch on disk)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    /// Collection the entry belongs to
    pub collection: Collection,
}

impl CacheEntry {
    /// An entry is live strictly before its expiry instant
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded
    #[error("Corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key/value storage for cache entries
///
/// Every mutation replaces or deletes one whole entry. Implementations must
/// treat deleting a missing entry as a successful no-op.
pub trait Store: Send + Sync {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Inserts the entry, replacing any entry with the same collection and key
    fn put(&self, entry: &CacheEntry) -> Result<(), StoreError>;

    /// Deletes an entry, returning whether it existed
    fn delete(&self, collection: Collection, key: &str) -> Result<bool, StoreError>;

    fn clear(&self, collection: Collection) -> Result<(), StoreError>;

    /// All entries currently stored in a collection, expired ones included
    fn entries(&self, collection: Collection) -> Result<Vec<CacheEntry>, StoreError>;
}

/// In-process store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(Collection, String), CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Collection, String), CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.lock().get(&(collection, key.to_string())).cloned())
    }

    fn put(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        self.lock()
            .insert((entry.collection, entry.key.clone()), entry.clone());
        Ok(())
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<bool, StoreError> {
        Ok(self.lock().remove(&(collection, key.to_string())).is_some())
    }

    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.lock().retain(|(c, _), _| *c != collection);
        Ok(())
    }

    fn entries(&self, collection: Collection) -> Result<Vec<CacheEntry>, StoreError> {
        Ok(self
            .lock()
            .values()
            .filter(|entry| entry.collection == collection)
            .cloned()
            .collect())
    }
}
