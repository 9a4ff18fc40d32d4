//! Fetch-through caching with TTL staleness and in-flight deduplication.
//!
//! One parameterized component replaces the per-endpoint cache copies the
//! catalog handlers would otherwise each carry: a [`FetchCache`] is
//! constructed once per logical resource with its own name and TTL, and every
//! read goes through [`FetchCache::load`]: fresh hit, or one coalesced fetch
//! shared by all concurrent callers.
//!
//! The caches live in `AppState` and are passed to consumers explicitly, so
//! tests get a fresh instance per case instead of sharing a process-global.

mod entry;
mod inflight;
mod store;

pub use entry::CacheEntry;
pub use store::CacheStore;

use crate::utils::fmt_duration;
use futures::FutureExt;
use inflight::{InflightRegistry, SharedFlight};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// A loader failure, shared verbatim with every caller attached to the
/// flight that produced it. Failures are never written to the store.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct LoadError(Arc<anyhow::Error>);

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        Self(Arc::new(err))
    }
}

/// Entry and in-flight counts for one cache, as reported by `/api/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub in_flight: usize,
}

/// Read-through cache for one logical resource.
///
/// `load` serves a fresh hit without touching the loader; on a miss it joins
/// or starts a single shared fetch per key, writes the result back, and hands
/// the same value (or the same error) to every waiting caller.
///
/// Clone-cheap; clones share the same store and registry.
pub struct FetchCache<T> {
    name: &'static str,
    store: CacheStore<T>,
    inflight: InflightRegistry<T>,
}

impl<T> Clone for FetchCache<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            store: self.store.clone(),
            inflight: self.inflight.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> FetchCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            store: CacheStore::new(ttl),
            inflight: InflightRegistry::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.store.ttl()
    }

    /// Get the value for `key`, fetching through `loader` on a miss.
    ///
    /// A fresh hit returns immediately and never invokes `loader`. Otherwise
    /// the caller joins the pending flight for `key` if one exists, or starts
    /// one. Exactly one loader runs per flight; its success is written to the
    /// store before any waiter resumes, and its failure is propagated to all
    /// of them without being cached.
    pub async fn load<F, Fut>(&self, key: &str, loader: F) -> Result<Arc<T>, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        if let Some(value) = self.store.get(key) {
            trace!(cache = self.name, key, "fresh hit");
            return Ok(value);
        }

        let flight = self
            .inflight
            .join_or_start(key, || self.start_flight(key, loader()));
        flight.await
    }

    /// Register a new flight that runs `fut`, stores its result, and
    /// unregisters itself.
    fn start_flight<Fut>(&self, key: &str, fut: Fut) -> SharedFlight<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let name = self.name;
        let store = self.store.clone();
        let inflight = self.inflight.clone();
        let key = key.to_owned();

        async move {
            // Re-check after winning the registration: a flight that settled
            // between our miss and now already left a fresh value behind.
            if let Some(value) = store.get(&key) {
                inflight.finish(&key);
                return Ok(value);
            }

            let started = Instant::now();
            let result = match fut.await {
                Ok(value) => {
                    let value = Arc::new(value);
                    store.insert(&key, Arc::clone(&value));
                    debug!(
                        cache = name,
                        key = %key,
                        elapsed = fmt_duration(started.elapsed()),
                        "refreshed"
                    );
                    Ok(value)
                }
                Err(err) => {
                    warn!(cache = name, key = %key, error = %err, "loader failed");
                    Err(LoadError::from(err))
                }
            };

            // Unregister before the flight resolves; no waiter can observe a
            // settled flight still present in the registry.
            inflight.finish(&key);
            result
        }
        .boxed()
        .shared()
    }

    /// Manually invalidate one key.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.store.remove(key);
        if removed {
            debug!(cache = self.name, key, "entry invalidated");
        }
        removed
    }

    /// Drop every cached entry, returning how many were held. Pending
    /// flights are unaffected; they re-populate the store when they land.
    pub fn clear(&self) -> usize {
        let cleared = self.store.clear();
        if cleared > 0 {
            debug!(cache = self.name, entries = cleared, "cache cleared");
        }
        cleared
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.store.len(),
            in_flight: self.inflight.len(),
        }
    }
}
