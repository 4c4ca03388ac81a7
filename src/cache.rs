//! Page and field-map cache
//!
//! One instance per scraper. Entries expire after the configured TTL and the
//! least recently used entry is evicted once capacity is reached. Loads
//! through [`Cache::get_or_try_insert_with`] are single-flight per key.

use crate::config::CacheConfig;
use dashmap::DashMap;
use lru::LruCache;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Keys are namespaced by operation so a URI never collides with script text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Page(String),
    Script(String),
}

impl CacheKey {
    fn kind(&self) -> &'static str {
        match self {
            CacheKey::Page(_) => "page",
            CacheKey::Script(_) => "script",
        }
    }
}

struct Entry<V> {
    value: V,
    inserted: Instant,
}

type Inflight = DashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>;

pub struct Cache<V> {
    entries: Mutex<LruCache<CacheKey, Entry<V>>>,
    inflight: Inflight,
    ttl: Option<Duration>,
}

impl<V: Clone> Cache<V> {
    /// `None` or `Some(0)` capacity means unbounded.
    pub fn new(capacity: Option<usize>, ttl: Option<Duration>) -> Self {
        let entries = match capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
            inflight: DashMap::new(),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.ttl())
    }

    /// Unbounded and never expiring.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if !self.is_expired(entry) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }
        debug!(kind = key.kind(), "cache entry expired");
        entries.pop(key);
        None
    }

    pub fn insert(&self, key: CacheKey, value: V) {
        let entry = Entry {
            value,
            inserted: Instant::now(),
        };
        let displaced = self.entries().push(key.clone(), entry);
        if let Some((evicted, _)) = displaced.filter(|(evicted, _)| *evicted != key) {
            debug!(kind = evicted.kind(), "cache evict");
        }
    }

    /// Return the cached value or run `init` once for this key, even under
    /// concurrent callers. Errors are not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: CacheKey, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!(kind = key.kind(), "cache hit");
            return Ok(value);
        }

        let lock = self.inflight.entry(key.clone()).or_default().clone();
        let _guard = lock.lock().await;
        let _slot = InflightSlot {
            inflight: &self.inflight,
            key: &key,
            lock: &lock,
        };

        // Someone else may have filled it while we waited.
        if let Some(value) = self.get(&key) {
            debug!(kind = key.kind(), "cache hit after wait");
            return Ok(value);
        }

        debug!(kind = key.kind(), "cache miss");
        let result = init().await;
        if let Ok(value) = &result {
            self.insert(key.clone(), value.clone());
        }
        result
    }

    pub fn clear(&self) {
        self.entries().clear();
        self.inflight.clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<CacheKey, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &Entry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.inserted.elapsed() >= ttl,
            None => false,
        }
    }
}

/// Releases a key's in-flight lock on every exit path, cancellation included.
struct InflightSlot<'a> {
    inflight: &'a Inflight,
    key: &'a CacheKey,
    lock: &'a Arc<tokio::sync::Mutex<()>>,
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        self.inflight
            .remove_if(self.key, |_, current| Arc::ptr_eq(current, self.lock));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(uri: &str) -> CacheKey {
        CacheKey::Page(uri.to_string())
    }

    #[test]
    fn get_after_insert() {
        let cache = Cache::unbounded();
        assert_eq!(cache.get(&page("a")), None);
        cache.insert(page("a"), 1);
        assert_eq!(cache.get(&page("a")), Some(1));
    }

    #[test]
    fn namespaces_do_not_collide() {
        let cache = Cache::unbounded();
        cache.insert(CacheKey::Page("same".into()), "page");
        cache.insert(CacheKey::Script("same".into()), "script");
        assert_eq!(cache.get(&CacheKey::Page("same".into())), Some("page"));
        assert_eq!(cache.get(&CacheKey::Script("same".into())), Some("script"));
    }

    #[test]
    fn clear_empties_everything() {
        let cache = Cache::unbounded();
        cache.insert(page("a"), 1);
        cache.insert(page("b"), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&page("a")), None);
    }

    #[test]
    fn capacity_evicts_least_recent() {
        let cache = Cache::new(Some(2), None);
        cache.insert(page("a"), 1);
        cache.insert(page("b"), 2);
        cache.insert(page("c"), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&page("a")), None);
        assert_eq!(cache.get(&page("b")), Some(2));
        assert_eq!(cache.get(&page("c")), Some(3));
    }

    #[test]
    fn reads_keep_entries_alive() {
        let cache = Cache::new(Some(2), None);
        cache.insert(page("a"), 1);
        cache.insert(page("b"), 2);
        assert_eq!(cache.get(&page("a")), Some(1));
        cache.insert(page("c"), 3);

        assert_eq!(cache.get(&page("a")), Some(1));
        assert_eq!(cache.get(&page("b")), None);
    }

    #[test]
    fn parallel_inserts_respect_capacity() {
        let cache = Cache::new(Some(2), None);
        std::thread::scope(|scope| {
            for t in 0..8 {
                let cache = &cache;
                scope.spawn(move || {
                    for i in 0..50 {
                        cache.insert(page(&format!("{t}-{i}")), i);
                        assert!(cache.len() <= 2);
                    }
                });
            }
        });
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_is_unbounded() {
        let cache = Cache::new(Some(0), None);
        for i in 0..10 {
            cache.insert(page(&i.to_string()), i);
        }
        assert_eq!(cache.len(), 10);
    }

    #[test]
    fn overwriting_at_capacity_keeps_others() {
        let cache = Cache::new(Some(2), None);
        cache.insert(page("a"), 1);
        cache.insert(page("b"), 2);
        cache.insert(page("b"), 20);
        assert_eq!(cache.get(&page("a")), Some(1));
        assert_eq!(cache.get(&page("b")), Some(20));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = Cache::new(None, Some(Duration::ZERO));
        cache.insert(page("a"), 1);
        assert_eq!(cache.get(&page("a")), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn init_runs_once_per_key() {
        let cache: Cache<u32> = Cache::unbounded();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with(page("a"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache: Cache<u32> = Cache::unbounded();
        let first = cache
            .get_or_try_insert_with(page("a"), || async { Err::<u32, _>("boom") })
            .await;
        assert!(first.is_err());
        assert!(cache.is_empty());

        let second = cache
            .get_or_try_insert_with(page("a"), || async { Ok::<_, &str>(3) })
            .await;
        assert_eq!(second, Ok(3));
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_init() {
        let cache: Cache<u32> = Cache::unbounded();
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, String>(5)
        };

        let (a, b) = tokio::join!(
            cache.get_or_try_insert_with(page("a"), load),
            cache.get_or_try_insert_with(page("a"), load),
        );
        assert_eq!(a, Ok(5));
        assert_eq!(b, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.inflight.is_empty());
    }

    #[tokio::test]
    async fn cancelled_load_releases_its_slot() {
        let cache: Cache<u32> = Cache::unbounded();
        let stalled = tokio::time::timeout(
            Duration::from_millis(10),
            cache.get_or_try_insert_with(page("a"), || std::future::pending::<Result<u32, String>>()),
        )
        .await;
        assert!(stalled.is_err());
        assert!(cache.inflight.is_empty());

        let value = cache
            .get_or_try_insert_with(page("a"), || async { Ok::<_, String>(9) })
            .await;
        assert_eq!(value, Ok(9));
    }

    #[test]
    fn clear_drops_inflight_slots() {
        let cache: Cache<u32> = Cache::unbounded();
        cache.inflight.insert(page("a"), Arc::default());
        cache.insert(page("b"), 1);
        cache.clear();
        assert!(cache.inflight.is_empty());
        assert!(cache.is_empty());
    }
}
