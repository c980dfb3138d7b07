//! Cache module for persisting API responses with expiry
//!
//! This module provides an expiring key/value cache partitioned into named
//! collections, each with its own TTL. Entries are kept by a pluggable `Store`:
//! `FileStore` survives restarts, `MemoryStore` lives only as long as the process.
//! Every storage failure degrades to a cache miss.

mod clock;
mod collection;
mod file_store;
mod manager;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::Collection;
pub use file_store::FileStore;
pub use manager::{CacheManager, CollectionStats, CLEANUP_DEBOUNCE_MINUTES};
pub use store::{CacheEntry, MemoryStore, Store, StoreError};
