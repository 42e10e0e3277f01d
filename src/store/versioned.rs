//! Versioned Store Module
//!
//! Authoritative record combining per-key version chains with the LRU read
//! cache and background snapshots.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::cache::{BoundedCache, CacheStats};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::{DurabilityManager, NoopObserver, StoreEvent, StoreObserver, StoreState};

// == Versioned Store ==
/// Durable, versioned key-value store with a bounded read cache.
///
/// Lock order is always store state, then cache. A read served by the cache
/// never takes the store lock.
pub struct VersionedStore {
    /// Current values and version chains
    state: Arc<Mutex<StoreState>>,
    /// LRU read cache over `state.data`
    cache: BoundedCache<String, Value>,
    durability: DurabilityManager,
    observer: Arc<dyn StoreObserver>,
}

impl VersionedStore {
    // == Constructor ==
    /// Opens a store, loading the snapshot when one is configured.
    ///
    /// A zero cache capacity is rejected. With a snapshot path this spawns the
    /// writer task on the current Tokio runtime; outside one it returns
    /// [`StoreError::NoRuntime`](crate::error::StoreError::NoRuntime).
    pub fn open(config: StoreConfig, observer: Arc<dyn StoreObserver>) -> Result<Self> {
        config.validate()?;
        let cache = BoundedCache::new(config.cache_capacity)?;

        let (state, durability) = match config.snapshot_path {
            Some(path) => {
                let loaded = DurabilityManager::load_on_startup(&path, observer.as_ref());
                let state = Arc::new(Mutex::new(loaded));
                let durability =
                    DurabilityManager::start(path, state.clone(), observer.clone())?;
                (state, durability)
            }
            None => (
                Arc::new(Mutex::new(StoreState::default())),
                DurabilityManager::memory_only(),
            ),
        };

        Ok(Self {
            state,
            cache,
            durability,
            observer,
        })
    }

    /// Memory-only store that reports nothing.
    pub fn in_memory(cache_capacity: usize) -> Result<Self> {
        Self::open(StoreConfig::in_memory(cache_capacity), Arc::new(NoopObserver))
    }

    // == Put ==
    /// Writes `value` as the newest version of `key` and returns its index.
    ///
    /// The snapshot is scheduled after the critical section is released.
    pub fn put(&self, key: impl Into<String>, value: Value) -> usize {
        let key = key.into();
        let version = {
            let mut state = self.state.lock();
            let version = state.record(key.clone(), value.clone());
            if let Some(evicted) = self.cache.put(key.clone(), value) {
                self.observer.on_event(&StoreEvent::Evicted { key: evicted });
            }
            self.observer.on_event(&StoreEvent::Put { key, version });
            version
        };
        self.durability.schedule();
        version
    }

    /// Same operation as [`put`](Self::put); every write is versioned.
    pub fn put_versioned(&self, key: impl Into<String>, value: Value) -> usize {
        self.put(key, value)
    }

    // == Get ==
    /// Returns the current value of `key`, or `default` when absent.
    pub fn get(&self, key: &str, default: Value) -> Value {
        self.try_get(key).unwrap_or(default)
    }

    /// Returns the current value of `key`.
    ///
    /// Checks the cache first; on a miss reads the authoritative map and
    /// warms the cache.
    pub fn try_get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.cache.get(key) {
            return Some(value);
        }

        let state = self.state.lock();
        let value = state.data.get(key)?.clone();
        if let Some(evicted) = self.cache.put(key.to_string(), value.clone()) {
            self.observer.on_event(&StoreEvent::Evicted { key: evicted });
        }
        Some(value)
    }

    // == Get Version ==
    /// Returns version `index` of `key`. Never touches the cache.
    pub fn get_version(&self, key: &str, index: usize) -> Option<Value> {
        self.state.lock().versions.get(key)?.get(index).cloned()
    }

    /// Number of versions recorded for `key`.
    pub fn version_count(&self, key: &str) -> usize {
        self.state
            .lock()
            .versions
            .get(key)
            .map(Vec::len)
            .unwrap_or(0)
    }

    // == Clear ==
    /// Drops every key and version chain and empties the cache.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.clear();
            self.cache.clear();
            self.observer.on_event(&StoreEvent::Cleared);
        }
        self.durability.schedule();
    }

    // == Flush ==
    /// Waits for every mutation made so far to reach the snapshot file.
    pub async fn flush(&self) -> Result<()> {
        self.durability.flush().await
    }

    /// Number of keys in the authoritative map.
    pub fn len(&self) -> usize {
        self.state.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.durability.path()
    }

    /// True while the snapshot writer is alive. Always false when memory-only.
    pub fn is_persisting(&self) -> bool {
        self.durability.is_running()
    }

    /// Whether `key` currently sits in the read cache.
    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains(key)
    }
}

impl std::fmt::Debug for VersionedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedStore")
            .field("keys", &self.len())
            .field("cache", &self.cache.stats())
            .field("durability", &self.durability)
            .finish()
    }
}
