//! Keyed in-memory store with freshness-aware reads.
//!
//! At most one entry per key. Expired entries are evicted lazily at the read
//! that observes them; there is no background sweeper. All contents are lost
//! on process restart, which is an accepted property of this cache.

use crate::cache::entry::CacheEntry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Keyed map of `CacheEntry` values sharing one fixed TTL.
///
/// Values are held behind `Arc` so a hit hands out a cheap clone without
/// copying the payload. Clone-cheap; clones share the same underlying map.
pub struct CacheStore<T> {
    entries: Arc<DashMap<String, CacheEntry<Arc<T>>>>,
    ttl: Duration,
}

impl<T> Clone for CacheStore<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl<T> CacheStore<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the value for `key` if present and fresh.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.get_at(key, Instant::now())
    }

    /// Freshness-aware read against an explicit clock reading.
    ///
    /// A stale entry is removed here rather than by a sweeper. The eviction
    /// re-checks staleness under the map lock so a refresh that raced this
    /// read is never discarded.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Arc<T>> {
        let hit = {
            let entry = self.entries.get(key)?;
            entry
                .is_fresh(now, self.ttl)
                .then(|| Arc::clone(entry.value().value()))
        };
        if hit.is_none() {
            self.entries
                .remove_if(key, |_, entry| !entry.is_fresh(now, self.ttl));
        }
        hit
    }

    /// Store a value for `key`, replacing any prior entry wholesale.
    pub fn insert(&self, key: &str, value: Arc<T>) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: &str, value: Arc<T>, now: Instant) {
        self.entries
            .insert(key.to_owned(), CacheEntry::new(value, now));
    }

    /// When the entry was last written, regardless of freshness.
    pub fn stored_at(&self, key: &str) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.stored_at())
    }

    /// Manual invalidation of a single key.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry, returning how many were held.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
