//! A single cached value with its storage timestamp.

use std::time::{Duration, Instant};

/// One cached value plus the instant it was written.
///
/// Entries are never mutated in place; a refresh replaces the entry wholesale
/// so `stored_at` always reflects the moment the current value was produced.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, stored_at: Instant) -> Self {
        Self { value, stored_at }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn stored_at(&self) -> Instant {
        self.stored_at
    }

    /// Whether this entry is still usable at `now` under the given TTL.
    ///
    /// Pure predicate over `(stored_at, now, ttl)`: fresh exactly when the
    /// entry's age does not exceed `ttl`. No clock-skew correction.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) <= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn fresh_within_ttl() {
        let t0 = Instant::now();
        let entry = CacheEntry::new(1, t0);
        assert!(entry.is_fresh(t0, TTL));
        assert!(entry.is_fresh(t0 + Duration::from_secs(30), TTL));
    }

    #[test]
    fn fresh_at_exact_ttl_boundary() {
        let t0 = Instant::now();
        let entry = CacheEntry::new(1, t0);
        // Age == TTL is still fresh; only strictly-older entries expire.
        assert!(entry.is_fresh(t0 + TTL, TTL));
        assert!(!entry.is_fresh(t0 + TTL + Duration::from_millis(1), TTL));
    }

    #[test]
    fn stale_past_ttl() {
        let t0 = Instant::now();
        let entry = CacheEntry::new(1, t0);
        assert!(!entry.is_fresh(t0 + Duration::from_secs(61), TTL));
    }

    #[test]
    fn now_before_stored_at_is_fresh() {
        // Instant is monotonic, but saturate rather than panic if a caller
        // passes an earlier reading.
        let t0 = Instant::now() + Duration::from_secs(10);
        let entry = CacheEntry::new(1, t0);
        assert!(entry.is_fresh(Instant::now(), TTL));
    }
}
