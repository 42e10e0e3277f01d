//! Bounded Cache Module
//!
//! Thread-safe, fixed-capacity LRU cache.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::cache::{CacheStats, LruArena};
use crate::error::{Result, StoreError};

#[derive(Debug)]
struct Inner<K, V> {
    arena: LruArena<K, V>,
    stats: CacheStats,
}

// == Bounded Cache ==
/// Fixed-capacity cache with least-recently-used eviction.
///
/// Every operation runs inside a single mutex critical section. There is no
/// reader/writer split because `get` reorders recency.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    inner: Mutex<Inner<K, V>>,
}

fn non_zero(capacity: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(capacity).ok_or_else(|| {
        StoreError::InvalidConfig("cache capacity must be greater than zero".to_string())
    })
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache. A zero capacity is a configuration error.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = non_zero(capacity)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                arena: LruArena::new(capacity),
                stats: CacheStats::new(capacity.get()),
            }),
        })
    }

    // == Get ==
    /// Returns a copy of the value and marks it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();
        let value = inner.arena.get(key).cloned();
        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        value
    }

    // == Put ==
    /// Inserts or overwrites `key` and marks it most recently used.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn put(&self, key: K, value: V) -> Option<K> {
        let mut inner = self.inner.lock();
        let evicted = inner.arena.put(key, value).map(|(k, _)| k);
        if evicted.is_some() {
            inner.stats.record_eviction();
        }
        evicted
    }

    /// Checks presence without touching recency or statistics.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().arena.contains(key)
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.inner.lock().arena.capacity()
    }

    // == Reset ==
    /// Replaces the contents with an empty arena.
    ///
    /// `None` keeps the current capacity. Statistics counters survive.
    pub fn reset(&self, capacity: Option<usize>) -> Result<()> {
        let mut inner = self.inner.lock();
        let capacity = match capacity {
            Some(c) => non_zero(c)?,
            None => non_zero(inner.arena.capacity())?,
        };
        inner.arena = LruArena::new(capacity);
        inner.stats.capacity = capacity.get();
        Ok(())
    }

    /// Drops every entry, keeping the current capacity and statistics.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let capacity = inner.arena.capacity_non_zero();
        inner.arena = LruArena::new(capacity);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().arena.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.entries = inner.arena.len();
        stats
    }
}
