/// Generic in-memory cache with absolute TTL, LRU eviction and
/// single-flight computation
///
/// Thread-safe, generic over key/value/error types.
/// Tracks metrics for monitoring.
///
/// A slot is either a stored value or a pending computation. Concurrent
/// misses for the same key join the pending computation instead of starting
/// their own. The computation runs as a spawned task that publishes its own
/// result, so a caller that stops waiting never cancels it for the others.
use super::config::CacheConfig;
use crate::logger::{self, LogTag};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinError;
use tokio::time::{Duration, Instant};

/// Shared handle on a computation every waiter for a key can await
type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

/// Stored value with its insertion time and last access tick
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    last_access: u64,
}

impl<V> CacheEntry<V> {
    fn new(value: V, tick: u64) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            last_access: tick,
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

enum Slot<V, E> {
    Ready(CacheEntry<V>),
    Pending { flight_id: u64, flight: Flight<V, E> },
}

/// Cache metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    /// Lookups that joined a computation already in flight
    pub coalesced: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub inserts: u64,
    /// Computations that ended in an error (never stored)
    pub failures: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.coalesced;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

enum Lookup<V, E> {
    Hit(V),
    InFlight(Flight<V, E>),
    Missing,
}

struct Inner<K, V, E> {
    slots: HashMap<K, Slot<V, E>>,
    /// Last access tick -> key of each stored value, least recently used first
    access_order: BTreeMap<u64, K>,
    next_tick: u64,
    metrics: CacheMetrics,
    next_flight_id: u64,
}

impl<K, V, E> Inner<K, V, E>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            access_order: BTreeMap::new(),
            next_tick: 0,
            metrics: CacheMetrics::default(),
            next_flight_id: 0,
        }
    }

    /// Classify a key, dropping it first if its value has expired
    fn lookup(&mut self, key: &K, ttl: Duration) -> Lookup<V, E> {
        let lookup = match self.slots.get(key) {
            Some(Slot::Ready(entry)) if entry.is_expired(ttl) => None,
            Some(Slot::Ready(entry)) => Some(Lookup::Hit(entry.value.clone())),
            Some(Slot::Pending { flight, .. }) => Some(Lookup::InFlight(flight.clone())),
            None => Some(Lookup::Missing),
        };

        match lookup {
            Some(Lookup::Hit(value)) => {
                self.touch(key);
                Lookup::Hit(value)
            }
            Some(other) => other,
            None => {
                self.remove(key);
                self.metrics.expirations += 1;
                Lookup::Missing
            }
        }
    }

    fn store(&mut self, key: K, value: V, capacity: usize) {
        let replacing = matches!(self.slots.get(&key), Some(Slot::Ready(_)));
        if capacity > 0 && !replacing {
            while self.access_order.len() >= capacity {
                if !self.evict_lru() {
                    break;
                }
            }
        }

        let tick = self.tick();
        let entry = CacheEntry::new(value, tick);
        if let Some(Slot::Ready(previous)) = self.slots.insert(key.clone(), Slot::Ready(entry)) {
            self.access_order.remove(&previous.last_access);
        }
        self.access_order.insert(tick, key);
        self.metrics.inserts += 1;
    }

    fn remove(&mut self, key: &K) {
        if let Some(Slot::Ready(entry)) = self.slots.remove(key) {
            self.access_order.remove(&entry.last_access);
        }
    }

    fn evict_lru(&mut self) -> bool {
        match self.access_order.pop_first() {
            Some((_, lru_key)) => {
                self.slots.remove(&lru_key);
                self.metrics.evictions += 1;
                true
            }
            None => false,
        }
    }

    fn tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    // Mark key as most recently used
    fn touch(&mut self, key: &K) {
        let tick = self.tick();
        if let Some(Slot::Ready(entry)) = self.slots.get_mut(key) {
            let previous = std::mem::replace(&mut entry.last_access, tick);
            self.access_order.remove(&previous);
            self.access_order.insert(tick, key.clone());
        }
    }

    fn is_current_flight(&self, key: &K, flight_id: u64) -> bool {
        matches!(
            self.slots.get(key),
            Some(Slot::Pending { flight_id: id, .. }) if *id == flight_id
        )
    }
}

/// Generic cache manager
pub struct CacheManager<K, V, E = Infallible> {
    config: CacheConfig,
    inner: Arc<Mutex<Inner<K, V, E>>>,
}

impl<K, V, E> Clone for CacheManager<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, E> CacheManager<K, V, E>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner::new())),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a stored value (None if expired, missing or still being computed)
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        match inner.lookup(key, self.config.ttl) {
            Lookup::Hit(value) => {
                inner.metrics.hits += 1;
                Some(value)
            }
            _ => {
                inner.metrics.misses += 1;
                None
            }
        }
    }

    /// Store a value directly (evicts LRU if at capacity)
    ///
    /// Replaces a pending computation for the same key; that computation's
    /// result is then discarded.
    pub fn insert(&self, key: K, value: V) {
        self.inner.lock().store(key, value, self.config.capacity);
    }

    pub fn remove(&self, key: &K) {
        self.inner.lock().remove(key);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.slots.clear();
        inner.access_order.clear();
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.inner.lock().metrics.clone()
    }

    /// Number of stored values (pending computations excluded)
    pub fn len(&self) -> usize {
        self.inner.lock().access_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of computations currently in flight
    pub fn in_flight(&self) -> usize {
        self.inner
            .lock()
            .slots
            .values()
            .filter(|slot| matches!(slot, Slot::Pending { .. }))
            .count()
    }
}

impl<K, V, E> CacheManager<K, V, E>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<JoinError> + 'static,
{
    /// Return the stored value for `key`, or compute it exactly once
    ///
    /// - Fresh value: returned immediately, `compute` is not called.
    /// - Computation in flight: the caller joins it and gets its outcome.
    /// - Otherwise `compute` is called to build the future, which is spawned.
    ///   A success is stored with a fresh TTL; an error is handed to every
    ///   waiter and nothing is stored, so the next call retries.
    ///
    /// `compute` runs under the cache lock and should only build the future.
    pub async fn get_or_compute<F, Fut>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let flight = {
            let mut inner = self.inner.lock();
            match inner.lookup(&key, self.config.ttl) {
                Lookup::Hit(value) => {
                    inner.metrics.hits += 1;
                    logger::verbose(LogTag::Cache, &format!("Hit for {:?}", key));
                    return Ok(value);
                }
                Lookup::InFlight(flight) => {
                    inner.metrics.coalesced += 1;
                    logger::debug(
                        LogTag::Cache,
                        &format!("Joining in-flight computation for {:?}", key),
                    );
                    flight
                }
                Lookup::Missing => {
                    inner.metrics.misses += 1;
                    self.start_flight(&mut inner, key, compute())
                }
            }
        };

        flight.await
    }

    fn start_flight<Fut>(&self, inner: &mut Inner<K, V, E>, key: K, computation: Fut) -> Flight<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let flight_id = inner.next_flight_id;
        inner.next_flight_id += 1;

        let task_inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let capacity = self.config.capacity;
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(computation).catch_unwind().await {
                Ok(result) => {
                    Self::finish_flight(&task_inner, capacity, &task_key, flight_id, &result);
                    result
                }
                Err(panic) => {
                    // Free the slot even when no waiter is left to see the JoinError
                    Self::abandon_flight(&task_inner, &task_key, flight_id);
                    std::panic::resume_unwind(panic)
                }
            }
        });

        let join_inner = Arc::clone(&self.inner);
        let join_key = key.clone();
        let flight = async move {
            match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    // Cancelled task never published; free the slot
                    Self::abandon_flight(&join_inner, &join_key, flight_id);
                    Err(E::from(join_err))
                }
            }
        }
        .boxed()
        .shared();

        logger::debug(
            LogTag::Cache,
            &format!("Starting computation #{} for {:?}", flight_id, key),
        );
        inner.slots.insert(
            key,
            Slot::Pending {
                flight_id,
                flight: flight.clone(),
            },
        );

        flight
    }

    fn finish_flight(
        inner: &Mutex<Inner<K, V, E>>,
        capacity: usize,
        key: &K,
        flight_id: u64,
        result: &Result<V, E>,
    ) {
        let mut inner = inner.lock();
        if !inner.is_current_flight(key, flight_id) {
            return;
        }

        inner.slots.remove(key);
        match result {
            Ok(value) => inner.store(key.clone(), value.clone(), capacity),
            Err(_) => {
                inner.metrics.failures += 1;
                logger::debug(
                    LogTag::Cache,
                    &format!("Computation #{} for {:?} failed, not cached", flight_id, key),
                );
            }
        }
    }

    fn abandon_flight(inner: &Mutex<Inner<K, V, E>>, key: &K, flight_id: u64) {
        let mut inner = inner.lock();
        if inner.is_current_flight(key, flight_id) {
            inner.slots.remove(key);
            inner.metrics.failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct TestError(String);

    impl From<JoinError> for TestError {
        fn from(err: JoinError) -> Self {
            TestError(err.to_string())
        }
    }

    type TestCache = CacheManager<&'static str, u32, TestError>;

    fn counting_compute(
        calls: &Arc<AtomicUsize>,
        value: u32,
        delay_ms: u64,
    ) -> impl Future<Output = Result<u32, TestError>> + Send + 'static {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(value)
        }
    }

    #[test]
    fn test_basic_operations() {
        let cache: CacheManager<String, String> = CacheManager::new(CacheConfig::custom(60, 100));

        cache.insert("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.get(&"nonexistent".to_string()), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.inserts, 1);

        cache.remove(&"key1".to_string());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiration() {
        let cache: CacheManager<String, String> = CacheManager::new(CacheConfig::custom(60, 100));

        cache.insert("key".to_string(), "value".to_string());
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"key".to_string()), Some("value".to_string()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"key".to_string()), None);
        assert_eq!(cache.metrics().expirations, 1);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_lru_eviction() {
        let cache: CacheManager<String, String> = CacheManager::new(CacheConfig::custom(60, 2));

        cache.insert("key1".to_string(), "value1".to_string());
        cache.insert("key2".to_string(), "value2".to_string());
        // Touch key1 so key2 becomes least recently used
        assert!(cache.get(&"key1".to_string()).is_some());
        cache.insert("key3".to_string(), "value3".to_string());

        assert_eq!(cache.get(&"key2".to_string()), None);
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.get(&"key3".to_string()), Some("value3".to_string()));
        assert_eq!(cache.metrics().evictions, 1);
    }

    #[tokio::test]
    async fn test_get_or_compute_stores_value() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_compute("k", || counting_compute(&calls, 7, 0))
            .await;
        let second = cache
            .get_or_compute("k", || counting_compute(&calls, 8, 0))
            .await;

        assert_eq!(first, Ok(7));
        assert_eq!(second, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let metrics = cache.metrics();
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_share_one_computation() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));
        let calls = Arc::new(AtomicUsize::new(0));

        let waiters = (0..8).map(|_| {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            async move {
                cache
                    .get_or_compute("k", || counting_compute(&calls, 42, 50))
                    .await
            }
        });
        let results = futures::future::join_all(waiters).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| *r == Ok(42)));
        assert_eq!(cache.metrics().coalesced, 7);
        assert_eq!(cache.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_keys_do_not_block() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));

        let stuck = cache.clone();
        let _blocked = tokio::spawn(async move {
            stuck
                .get_or_compute("slow", || std::future::pending::<Result<u32, TestError>>())
                .await
        });
        tokio::task::yield_now().await;

        let fast = tokio::time::timeout(
            Duration::from_millis(100),
            cache.get_or_compute("fast", || async { Ok(1) }),
        )
        .await;

        assert_eq!(fast.unwrap(), Ok(1));
        assert_eq!(cache.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));

        let failed = cache
            .get_or_compute("k", || async { Err(TestError("boom".to_string())) })
            .await;
        assert_eq!(failed, Err(TestError("boom".to_string())));
        assert_eq!(cache.get(&"k"), None);

        let retried = cache.get_or_compute("k", || async { Ok(5) }).await;
        assert_eq!(retried, Ok(5));

        let metrics = cache.metrics();
        assert_eq!(metrics.failures, 1);
        assert_eq!(metrics.inserts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reaches_every_waiter() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));

        let waiters = (0..3).map(|_| {
            let cache = cache.clone();
            async move {
                cache
                    .get_or_compute("k", || async {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Err(TestError("down".to_string()))
                    })
                    .await
            }
        });
        let results = futures::future::join_all(waiters).await;

        assert!(results
            .iter()
            .all(|r| *r == Err(TestError("down".to_string()))));
        assert_eq!(cache.metrics().failures, 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_computation_frees_the_key() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));

        let result = cache
            .get_or_compute("k", || async {
                if true {
                    panic!("computation exploded");
                }
                Ok(0)
            })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.in_flight(), 0);

        let retried = cache.get_or_compute("k", || async { Ok(9) }).await;
        assert_eq!(retried, Ok(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_without_waiters_does_not_poison_the_key() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));

        let gave_up = tokio::time::timeout(
            Duration::from_millis(10),
            cache.get_or_compute("k", || async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                if true {
                    panic!("computation exploded");
                }
                Ok(0)
            }),
        )
        .await;
        assert!(gave_up.is_err());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.in_flight(), 0);
        assert_eq!(cache.metrics().failures, 1);

        let retried = cache.get_or_compute("k", || async { Ok(5) }).await;
        assert_eq!(retried, Ok(5));
    }

    #[test]
    fn test_lru_order_follows_repeated_access() {
        let cache: CacheManager<u32, u32> = CacheManager::new(CacheConfig::custom(60, 3));

        for key in 1..=3 {
            cache.insert(key, key * 10);
        }
        assert!(cache.get(&1).is_some());
        cache.insert(2, 21);
        assert!(cache.get(&3).is_some());
        assert!(cache.get(&1).is_some());
        // Least recently used first: 2, 3, 1

        cache.insert(4, 40);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.len(), 3);

        cache.insert(5, 50);
        assert_eq!(cache.get(&3), None);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.metrics().evictions, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_waiter_does_not_cancel_computation() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));
        let calls = Arc::new(AtomicUsize::new(0));

        let gave_up = tokio::time::timeout(
            Duration::from_millis(10),
            cache.get_or_compute("k", || counting_compute(&calls, 3, 100)),
        )
        .await;
        assert!(gave_up.is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cache.get(&"k"), Some(3));

        let again = cache
            .get_or_compute("k", || counting_compute(&calls, 4, 0))
            .await;
        assert_eq!(again, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_value_is_recomputed() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_compute("k", || counting_compute(&calls, 1, 0))
            .await;
        tokio::time::advance(Duration::from_secs(61)).await;
        let second = cache
            .get_or_compute("k", || counting_compute(&calls, 2, 0))
            .await;

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.metrics().expirations, 1);
    }

    #[tokio::test]
    async fn test_insert_supersedes_pending_computation() {
        let cache = TestCache::new(CacheConfig::custom(60, 10));
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let computing = cache.clone();
        let waiter = tokio::spawn(async move {
            computing
                .get_or_compute("k", || async move {
                    let _ = release_rx.await;
                    Ok(1)
                })
                .await
        });
        while cache.in_flight() == 0 {
            tokio::task::yield_now().await;
        }

        cache.insert("k", 99);
        let _ = release_tx.send(());

        // The waiter still sees its own computation's outcome
        assert_eq!(waiter.await.unwrap(), Ok(1));
        assert_eq!(cache.get(&"k"), Some(99));
    }
}
