//! Background Tasks Module
//!
//! Contains background tasks that run alongside the store.
//!
//! # Tasks
//! - Snapshot Writer: Persists the latest store state on request

mod snapshot_writer;

pub use snapshot_writer::{spawn_snapshot_writer, Completion};
