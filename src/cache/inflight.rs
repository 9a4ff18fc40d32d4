//! Registry of pending loads, one shared flight per key.
//!
//! While a key is registered, every concurrent caller for that key attaches
//! to the same shared future instead of starting its own fetch. The flight
//! unregisters itself when it settles, so an entry's lifetime is exactly the
//! duration of the underlying fetch.

use crate::cache::LoadError;
use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;

/// A pending load, shareable across every caller that attaches to it.
pub(crate) type SharedFlight<T> = Shared<BoxFuture<'static, Result<Arc<T>, LoadError>>>;

pub(crate) struct InflightRegistry<T> {
    flights: Arc<DashMap<String, SharedFlight<T>>>,
}

impl<T> Clone for InflightRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            flights: Arc::clone(&self.flights),
        }
    }
}

impl<T> InflightRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
        }
    }

    /// Attach to the pending flight for `key`, or register the one produced
    /// by `start`.
    ///
    /// The check-then-register step runs under the map's shard lock with no
    /// suspension point in between, so two callers can never both decide to
    /// start a fetch for the same key. `start` must only construct the
    /// future; it runs synchronously while the lock is held.
    pub(crate) fn join_or_start(
        &self,
        key: &str,
        start: impl FnOnce() -> SharedFlight<T>,
    ) -> SharedFlight<T> {
        self.flights
            .entry(key.to_owned())
            .or_insert_with(start)
            .clone()
    }

    /// Unregister `key`. Called by the flight itself on every settlement
    /// path, success or failure.
    pub(crate) fn finish(&self, key: &str) {
        self.flights.remove(key);
    }

    pub(crate) fn len(&self) -> usize {
        self.flights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn flight_of(value: i32) -> SharedFlight<i32> {
        async move { Ok(Arc::new(value)) }.boxed().shared()
    }

    #[tokio::test]
    async fn second_caller_attaches_instead_of_starting() {
        let registry: InflightRegistry<i32> = InflightRegistry::new();
        let starts = AtomicUsize::new(0);

        let first = registry.join_or_start("k", || {
            starts.fetch_add(1, Ordering::SeqCst);
            flight_of(1)
        });
        let second = registry.join_or_start("k", || {
            starts.fetch_add(1, Ordering::SeqCst);
            flight_of(2)
        });

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert_eq!(*first.await.unwrap(), 1);
        assert_eq!(*second.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn distinct_keys_get_distinct_flights() {
        let registry: InflightRegistry<i32> = InflightRegistry::new();
        let a = registry.join_or_start("a", || flight_of(1));
        let b = registry.join_or_start("b", || flight_of(2));

        assert_eq!(registry.len(), 2);
        assert_eq!(*a.await.unwrap(), 1);
        assert_eq!(*b.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn finish_unregisters_the_key() {
        let registry: InflightRegistry<i32> = InflightRegistry::new();
        registry.join_or_start("k", || flight_of(1));
        assert_eq!(registry.len(), 1);

        registry.finish("k");
        assert_eq!(registry.len(), 0);

        // A later call starts a fresh flight.
        let starts = AtomicUsize::new(0);
        registry.join_or_start("k", || {
            starts.fetch_add(1, Ordering::SeqCst);
            flight_of(3)
        });
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }
}
