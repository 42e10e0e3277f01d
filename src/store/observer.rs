//! Store Observer Module
//!
//! Observability capability injected into the store at construction.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

// == Store Event ==
/// Something the store wants reported.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A value was written as version `version` of `key`
    Put { key: String, version: usize },
    /// The cache evicted `key` to make room
    Evicted { key: String },
    /// All keys and version chains were dropped
    Cleared,
    /// A snapshot was loaded at startup
    SnapshotLoaded { path: PathBuf, keys: usize },
    /// No snapshot existed at startup
    SnapshotMissing { path: PathBuf },
    /// The startup snapshot was unreadable and has been discarded
    SnapshotLoadFailed { path: PathBuf, error: String },
    /// A background snapshot landed on disk
    SnapshotWritten { path: PathBuf, generation: u64 },
    /// A background snapshot write failed
    SnapshotFailed {
        path: PathBuf,
        generation: u64,
        error: String,
    },
}

// == Observer Trait ==
/// Receives store events.
///
/// Implementations are called from inside the store's critical section for
/// write events, so they must be quick and must not call back into the store.
pub trait StoreObserver: Send + Sync + 'static {
    fn on_event(&self, event: &StoreEvent);
}

/// Reports events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn on_event(&self, event: &StoreEvent) {
        match event {
            StoreEvent::Put { key, version } => {
                debug!(key = %key, version, "stored value");
            }
            StoreEvent::Evicted { key } => {
                debug!(key = %key, "evicted from cache");
            }
            StoreEvent::Cleared => info!("store cleared"),
            StoreEvent::SnapshotLoaded { path, keys } => {
                info!("Loaded snapshot from {} ({} keys)", path.display(), keys);
            }
            StoreEvent::SnapshotMissing { path } => {
                info!("No snapshot at {}, starting empty", path.display());
            }
            StoreEvent::SnapshotLoadFailed { path, error } => {
                warn!(
                    "Discarding unreadable snapshot {}: {}; starting empty",
                    path.display(),
                    error
                );
            }
            StoreEvent::SnapshotWritten { path, generation } => {
                debug!(generation, "snapshot written to {}", path.display());
            }
            StoreEvent::SnapshotFailed {
                path,
                generation,
                error,
            } => {
                error!(generation, "Snapshot write to {} failed: {}", path.display(), error);
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {
    fn on_event(&self, _event: &StoreEvent) {}
}
