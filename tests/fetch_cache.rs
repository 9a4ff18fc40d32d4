//! Behavioral tests for the fetch-through cache: freshness, single-flight
//! coalescing, failure propagation, and registry cleanup.
//!
//! All tests run on the current-thread runtime with loaders gated on
//! channels or yields, so scheduling is deterministic and no test sleeps on
//! a real clock.

use encore::cache::FetchCache;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::yield_now;

const TTL: Duration = Duration::from_secs(60);

/// Park the current task a few times so spawned loads reach their first
/// suspension point.
async fn settle() {
    for _ in 0..20 {
        yield_now().await;
    }
}

/// A loader that counts invocations and blocks until `gate` fires.
fn gated_loader(
    value: i32,
    calls: &Arc<AtomicUsize>,
    gate: &Arc<Notify>,
) -> impl FnOnce() -> std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<i32>> + Send>> + use<>
{
    let calls = Arc::clone(calls);
    let gate = Arc::clone(gate);
    move || {
        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            Ok(value)
        })
    }
}

#[tokio::test]
async fn concurrent_loads_share_one_fetch() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let first = tokio::spawn({
        let cache = cache.clone();
        let loader = gated_loader(7, &calls, &gate);
        async move { cache.load("artists", loader).await }
    });
    let second = tokio::spawn({
        let cache = cache.clone();
        let loader = gated_loader(8, &calls, &gate);
        async move { cache.load("artists", loader).await }
    });

    settle().await;
    gate.notify_waiters();

    let a = first.await.unwrap().unwrap();
    let b = second.await.unwrap().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1, "loader must run once");
    assert_eq!(*a, *b, "all callers observe the same value");
}

#[tokio::test]
async fn distinct_keys_do_not_coalesce() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let a = tokio::spawn({
        let cache = cache.clone();
        let loader = gated_loader(1, &calls, &gate);
        async move { cache.load("genres", loader).await }
    });
    let b = tokio::spawn({
        let cache = cache.clone();
        let loader = gated_loader(2, &calls, &gate);
        async move { cache.load("songs", loader).await }
    });

    settle().await;
    gate.notify_waiters();

    assert_eq!(*a.await.unwrap().unwrap(), 1);
    assert_eq!(*b.await.unwrap().unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fresh_hit_never_invokes_loader() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);

    let first = cache
        .load("x", || async { Ok(1) })
        .await
        .unwrap();
    assert_eq!(*first, 1);

    // Well within the TTL: the second loader must not run.
    let invoked = Arc::new(AtomicBool::new(false));
    let second = {
        let invoked = Arc::clone(&invoked);
        cache
            .load("x", move || async move {
                invoked.store(true, Ordering::SeqCst);
                Ok(2)
            })
            .await
            .unwrap()
    };

    assert_eq!(*second, 1);
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn failure_propagates_to_every_caller() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let failing_loader = |calls: &Arc<AtomicUsize>, gate: &Arc<Notify>| {
        let calls = Arc::clone(calls);
        let gate = Arc::clone(gate);
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            Err::<i32, _>(anyhow::anyhow!("db down"))
        }
    };

    let first = tokio::spawn({
        let cache = cache.clone();
        let loader = failing_loader(&calls, &gate);
        async move { cache.load("artists", loader).await }
    });
    let second = tokio::spawn({
        let cache = cache.clone();
        let loader = failing_loader(&calls, &gate);
        async move { cache.load("artists", loader).await }
    });

    settle().await;
    gate.notify_waiters();

    let a = first.await.unwrap();
    let b = second.await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(a.unwrap_err().to_string(), "db down");
    assert_eq!(b.unwrap_err().to_string(), "db down");
}

#[tokio::test]
async fn failures_are_not_cached() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);

    let err = cache
        .load("artists", || async { Err(anyhow::anyhow!("db down")) })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "db down");
    assert_eq!(cache.stats().entries, 0, "a failure must never be stored");

    // The next call starts a fresh attempt.
    let calls = Arc::new(AtomicUsize::new(0));
    let value = {
        let calls = Arc::clone(&calls);
        cache
            .load("artists", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            })
            .await
            .unwrap()
    };

    assert_eq!(*value, 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn registry_is_empty_after_settlement() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);

    cache.load("ok", || async { Ok(1) }).await.unwrap();
    assert_eq!(cache.stats().in_flight, 0);

    cache
        .load("bad", || async { Err::<i32, _>(anyhow::anyhow!("nope")) })
        .await
        .unwrap_err();
    assert_eq!(cache.stats().in_flight, 0);
}

#[tokio::test]
async fn success_lands_in_the_store() {
    let cache: FetchCache<Vec<&'static str>> = FetchCache::new("test", TTL);

    cache
        .load("genres", || async { Ok(vec!["Pop", "Rock"]) })
        .await
        .unwrap();

    assert_eq!(cache.stats().entries, 1);

    // Served from cache on the next read.
    let hit = cache
        .load("genres", || async { unreachable!("fresh hit must not fetch") })
        .await
        .unwrap();
    assert_eq!(*hit, vec!["Pop", "Rock"]);
}

#[tokio::test]
async fn clear_forces_the_next_load_to_fetch() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);

    cache.load("k", || async { Ok(1) }).await.unwrap();
    assert_eq!(cache.clear(), 1);

    let calls = Arc::new(AtomicUsize::new(0));
    let value = {
        let calls = Arc::clone(&calls);
        cache
            .load("k", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await
            .unwrap()
    };

    assert_eq!(*value, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remove_invalidates_a_single_key() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);

    cache.load("a", || async { Ok(1) }).await.unwrap();
    cache.load("b", || async { Ok(2) }).await.unwrap();

    assert!(cache.remove("a"));
    assert!(!cache.remove("a"));
    assert_eq!(cache.stats().entries, 1);

    // "b" is untouched.
    let hit = cache
        .load("b", || async { unreachable!("fresh hit must not fetch") })
        .await
        .unwrap();
    assert_eq!(*hit, 2);
}

#[tokio::test]
async fn late_caller_attaches_to_the_pending_flight() {
    let cache: FetchCache<i32> = FetchCache::new("test", TTL);
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let first = tokio::spawn({
        let cache = cache.clone();
        let loader = gated_loader(5, &calls, &gate);
        async move { cache.load("k", loader).await }
    });

    settle().await;
    assert_eq!(cache.stats().in_flight, 1);

    // Joins while the first fetch is suspended.
    let second = tokio::spawn({
        let cache = cache.clone();
        let loader = gated_loader(6, &calls, &gate);
        async move { cache.load("k", loader).await }
    });

    settle().await;
    gate.notify_waiters();

    assert_eq!(*first.await.unwrap().unwrap(), 5);
    assert_eq!(*second.await.unwrap().unwrap(), 5);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
