//! Durability Manager Module
//!
//! Loads the snapshot at startup and drives the background snapshot writer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{Result, StoreError};
use crate::store::{read_snapshot, StoreEvent, StoreObserver, StoreState};
use crate::tasks::{spawn_snapshot_writer, Completion};

#[derive(Debug)]
struct WriterHandle {
    path: PathBuf,
    requests: watch::Sender<u64>,
    completions: watch::Receiver<Completion>,
    task: JoinHandle<()>,
}

// == Durability Manager ==
/// Keeps the snapshot file eventually in agreement with the live store.
///
/// Callers never wait on disk: [`schedule`](Self::schedule) only bumps a
/// generation counter. Completed writes land in generation order because a
/// single writer task performs them.
#[derive(Debug)]
pub struct DurabilityManager {
    writer: Option<WriterHandle>,
}

impl DurabilityManager {
    /// Manager for a store without persistence.
    pub fn memory_only() -> Self {
        Self { writer: None }
    }

    /// Starts the writer task for `path` on the current Tokio runtime.
    ///
    /// Fails with [`StoreError::NoRuntime`] when called outside one.
    pub fn start(
        path: PathBuf,
        state: Arc<Mutex<StoreState>>,
        observer: Arc<dyn StoreObserver>,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| StoreError::NoRuntime(e.to_string()))?;
        let (requests, request_rx) = watch::channel(0u64);
        let (completion_tx, completions) = watch::channel(Completion::initial());
        let task = spawn_snapshot_writer(
            &runtime,
            state,
            path.clone(),
            request_rx,
            completion_tx,
            observer,
        );

        Ok(Self {
            writer: Some(WriterHandle {
                path,
                requests,
                completions,
                task,
            }),
        })
    }

    // == Load On Startup ==
    /// Reads the snapshot once before the store accepts traffic.
    ///
    /// Missing and unreadable snapshots both yield an empty state; the latter
    /// is reported and its contents discarded.
    pub fn load_on_startup(path: &Path, observer: &dyn StoreObserver) -> StoreState {
        match read_snapshot(path) {
            Ok(Some(state)) => {
                observer.on_event(&StoreEvent::SnapshotLoaded {
                    path: path.to_path_buf(),
                    keys: state.data.len(),
                });
                state
            }
            Ok(None) => {
                observer.on_event(&StoreEvent::SnapshotMissing {
                    path: path.to_path_buf(),
                });
                StoreState::default()
            }
            Err(e) => {
                observer.on_event(&StoreEvent::SnapshotLoadFailed {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                StoreState::default()
            }
        }
    }

    // == Schedule ==
    /// Requests a snapshot of the current state and returns immediately.
    pub fn schedule(&self) {
        if let Some(writer) = &self.writer {
            writer.requests.send_modify(|generation| *generation += 1);
        }
    }

    // == Flush ==
    /// Waits until every snapshot requested so far has been covered by a
    /// completed write, and returns that write's outcome.
    pub async fn flush(&self) -> Result<()> {
        let Some(writer) = &self.writer else {
            return Ok(());
        };

        let target = *writer.requests.borrow();
        let mut completions = writer.completions.clone();
        let outcome = completions
            .wait_for(|c| c.generation >= target)
            .await
            .map_err(|_| StoreError::WriterStopped)?
            .outcome
            .clone();

        outcome.map_err(StoreError::Snapshot)
    }

    /// Snapshot file, if persistence is enabled.
    pub fn path(&self) -> Option<&Path> {
        self.writer.as_ref().map(|w| w.path.as_path())
    }

    /// True while the writer task is alive.
    pub fn is_running(&self) -> bool {
        self.writer
            .as_ref()
            .map(|w| !w.task.is_finished())
            .unwrap_or(false)
    }
}
