//! verkv - A versioned key-value store with a bounded read cache
//!
//! Keeps every write as a per-key version chain, serves recent reads from a
//! fixed-capacity LRU cache and persists the whole record to a JSON snapshot
//! from a background writer.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedCache, CacheStats};
pub use config::{Config, StoreConfig};
pub use error::{Result, StoreError};
pub use store::{NoopObserver, StoreEvent, StoreObserver, TracingObserver, VersionedStore};
