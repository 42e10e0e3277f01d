//! Store Module
//!
//! The authoritative versioned record, its snapshot format, durability
//! management and the observer capability it reports through.

mod durability;
mod observer;
mod snapshot;
mod versioned;

pub use durability::DurabilityManager;
pub use observer::{NoopObserver, StoreEvent, StoreObserver, TracingObserver};
pub use snapshot::{read_snapshot, write_snapshot, StoreState};
pub use versioned::VersionedStore;

#[cfg(test)]
pub(crate) use observer::testing;
