//! Memoization of chart computations
//!
//! Charts that depend only on (moment, latitude, longitude) are cached for
//! the life of the process. Entries are never evicted or invalidated. Values
//! are stored behind `Arc` so readers never see a partially written entry.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

/// Exact-equality key for a chart request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub moment: DateTime<Utc>,
    latitude_bits: u64,
    longitude_bits: u64,
}

impl CacheKey {
    pub fn new(moment: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            moment,
            latitude_bits: canonical_bits(latitude),
            longitude_bits: canonical_bits(longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        f64::from_bits(self.latitude_bits)
    }

    pub fn longitude(&self) -> f64 {
        f64::from_bits(self.longitude_bits)
    }
}

/// Key for a progressed chart: the natal request plus the progression epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressedKey {
    pub natal: CacheKey,
    pub epoch: DateTime<Utc>,
}

// -0.0 and 0.0 are the same coordinate
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Unbounded, process-lifetime key/value cache safe for concurrent use
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached value
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        // A panic while holding the lock cannot leave a half-inserted Arc behind
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Insert a value; if another writer got there first, its value wins
    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert_with(|| Arc::new(value)).clone()
    }

    /// Return the cached value or compute, insert and return it.
    ///
    /// The computation runs without holding the lock, so two concurrent
    /// misses may both compute; only the first insert is kept. Errors are
    /// not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(value) = self.get(&key) {
            tracing::debug!("cache hit");
            return Ok(value);
        }
        tracing::debug!("cache miss");
        let value = compute()?;
        Ok(self.insert(key, value))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::thread;

    fn moment() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1990, 1, 1, 3, 0, 0).unwrap()
    }

    #[test]
    fn test_key_exact_equality() {
        let a = CacheKey::new(moment(), 35.69, 139.692);
        let b = CacheKey::new(moment(), 35.69, 139.692);
        let c = CacheKey::new(moment(), 35.690001, 139.692);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(CacheKey::new(moment(), -0.0, 0.0), CacheKey::new(moment(), 0.0, 0.0));
        assert_eq!(a.latitude(), 35.69);
    }

    #[test]
    fn test_get_or_insert_computes_once() {
        let cache: MemoCache<CacheKey, u32> = MemoCache::new();
        let key = CacheKey::new(moment(), 1.0, 2.0);
        let mut calls = 0;

        let first = cache
            .get_or_try_insert_with(key, || {
                calls += 1;
                Ok::<_, String>(7)
            })
            .unwrap();
        let second = cache
            .get_or_try_insert_with(key, || {
                calls += 1;
                Ok::<_, String>(8)
            })
            .unwrap();

        assert_eq!(*first, 7);
        assert_eq!(*second, 7);
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache: MemoCache<u8, u8> = MemoCache::new();
        let err = cache.get_or_try_insert_with(1, || Err::<u8, _>("boom"));
        assert_eq!(err.unwrap_err(), "boom");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_first_insert_wins() {
        let cache: MemoCache<u8, &str> = MemoCache::new();
        assert_eq!(*cache.insert(1, "a"), "a");
        assert_eq!(*cache.insert(1, "b"), "a");
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache: Arc<MemoCache<u32, u32>> = Arc::new(MemoCache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        let v = cache
                            .get_or_try_insert_with(i, || Ok::<_, ()>(i * 2))
                            .unwrap();
                        assert_eq!(*v, i * 2, "thread {}", t);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 100);
    }
}
