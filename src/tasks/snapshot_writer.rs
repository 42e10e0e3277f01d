//! Snapshot Writer Task
//!
//! Background task that persists the store whenever a snapshot is requested.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::{write_snapshot, StoreEvent, StoreObserver, StoreState};

/// Outcome of the most recent snapshot write.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Highest request generation covered by the write
    pub generation: u64,
    /// `Err` carries the rendered write error
    pub outcome: std::result::Result<(), String>,
}

impl Completion {
    /// Completion marker for a writer that has not written anything yet.
    pub fn initial() -> Self {
        Self {
            generation: 0,
            outcome: Ok(()),
        }
    }
}

/// Spawns the single writer task for one store.
///
/// `requests` carries a generation counter bumped after every mutation. The
/// task wakes on change, and under the store lock reads the latest generation
/// and clones the state, so a burst of requests collapses into one write of
/// the newest state. Each finished write is published on `completions`.
///
/// The task exits once the request sender is dropped and any pending request
/// has been written.
///
/// # Arguments
/// * `runtime` - Runtime the task is spawned on
/// * `state` - Store state shared with the owning store
/// * `path` - Snapshot file to overwrite
/// * `requests` - Generation counter receiver
/// * `completions` - Where finished writes are reported
/// * `observer` - Receives written/failed events
pub fn spawn_snapshot_writer(
    runtime: &Handle,
    state: Arc<Mutex<StoreState>>,
    path: PathBuf,
    mut requests: watch::Receiver<u64>,
    completions: watch::Sender<Completion>,
    observer: Arc<dyn StoreObserver>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        while requests.changed().await.is_ok() {
            let (generation, snapshot) = {
                let guard = state.lock();
                let generation = *requests.borrow_and_update();
                (generation, guard.clone())
            };

            let outcome = match write_snapshot(&path, &snapshot).await {
                Ok(()) => {
                    observer.on_event(&StoreEvent::SnapshotWritten {
                        path: path.clone(),
                        generation,
                    });
                    Ok(())
                }
                Err(e) => {
                    let error = e.to_string();
                    observer.on_event(&StoreEvent::SnapshotFailed {
                        path: path.clone(),
                        generation,
                        error: error.clone(),
                    });
                    Err(error)
                }
            };

            completions.send_replace(Completion {
                generation,
                outcome,
            });
        }
    })
}
