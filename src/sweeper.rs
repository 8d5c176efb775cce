//! Component 5 — the sweeper (§4.5): the sole background task that reclaims
//! regions whose refcount has reached zero.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::allocator::Allocator;
use crate::diagnostics;

/// The production sweep interval named by the spec (§4.5): 2 seconds.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(2);

/// Handle used to request the sweeper to stop and to join it at shutdown.
pub struct SweeperHandle {
    stop_flag: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    /// Sets the stop flag and waits for the sweeper's current iteration to
    /// finish and the task to exit. Must be called — and must complete —
    /// before the arena is dropped (§5's shutdown ordering).
    pub async fn shutdown(self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Err(error) = self.task.await {
            warn!(%error, "sweeper task panicked during shutdown");
        }
    }
}

/// Spawns the sweeper loop described in §4.5:
/// 1. Sleep for `interval`.
/// 2-3. Collect zero-refcount ids and remove each, in one continuous hold of
///    the allocator's lock (`Allocator::sweep`) — this is what makes a
///    racing `inc_ref` ("resurrection", §9/S5) safe: there is no window
///    between collection and removal for another thread to revive a region.
/// 4. If anything was removed, snapshot and hand it to the dump writer.
/// 5. Exit if the stop flag is set.
pub fn spawn(allocator: Arc<Allocator>, dump_folder: std::path::PathBuf, interval: Duration) -> SweeperHandle {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let task_stop_flag = stop_flag.clone();

    let task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let removed_ids = allocator.sweep();

            if !removed_ids.is_empty() {
                debug!(count = removed_ids.len(), "sweeper reclaimed regions");
                let snapshot = allocator.snapshot();
                if let Err(error) = diagnostics::write_sweep_dump(&dump_folder, &snapshot) {
                    warn!(%error, "failed to write sweeper dump");
                }
            }

            if task_stop_flag.load(Ordering::SeqCst) {
                info!("sweeper stopping");
                break;
            }
        }
    });

    SweeperHandle { stop_flag, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTag;

    #[tokio::test]
    async fn sweeper_reclaims_zero_refcount_region() {
        let allocator = Arc::new(Allocator::new(1024));
        let id = allocator.allocate(TypeTag::Int32, 32).unwrap();
        allocator.dec_ref(id);

        let dump_dir = tempfile::tempdir().unwrap();
        let handle = spawn(allocator.clone(), dump_dir.path().to_path_buf(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(80)).await;
        handle.shutdown().await;

        assert!(allocator.read(id).is_err());
    }

    #[tokio::test]
    async fn sweeper_leaves_resurrected_region_alive() {
        let allocator = Arc::new(Allocator::new(1024));
        let id = allocator.allocate(TypeTag::Int32, 32).unwrap();
        allocator.dec_ref(id);
        allocator.inc_ref(id);

        let dump_dir = tempfile::tempdir().unwrap();
        let handle = spawn(allocator.clone(), dump_dir.path().to_path_buf(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(80)).await;
        handle.shutdown().await;

        assert!(allocator.read(id).is_ok());
    }
}
