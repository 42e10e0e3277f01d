//! Cache Module
//!
//! Provides the bounded, thread-safe LRU read cache that sits in front of the
//! versioned store.

mod bounded;
mod lru;
mod stats;


// Re-export public types
pub use bounded::BoundedCache;
pub use lru::LruArena;
pub use stats::CacheStats;
