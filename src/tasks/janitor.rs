//! Expiry Janitor
//!
//! Background task that periodically removes expired entries from every shard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::ShardSet;
use crate::error::{CacheError, Result};

// == Janitor ==
/// Handle to the running sweep task.
///
/// The task runs until [`Janitor::stop`] is awaited. Dropping the handle
/// aborts a task that was never stopped.
#[derive(Debug)]
pub struct Janitor {
    stop_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Janitor {
    /// Spawns the sweep loop on the current Tokio runtime.
    ///
    /// Every `interval` the loop calls `evict_expired` on each shard in turn.
    /// Fails with `Config` when called outside a runtime.
    pub fn start(shards: Arc<ShardSet>, interval: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| {
            CacheError::Config("expiry sweep requires a Tokio runtime".to_string())
        })?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = runtime.spawn(run(shards, interval, stop_rx));

        Ok(Self {
            stop_tx,
            handle: Mutex::new(Some(handle)),
        })
    }

    // == Stop ==
    /// Signals the loop to exit and waits for it.
    ///
    /// A sweep already in progress finishes first. Calling this twice is a no-op.
    pub async fn stop(&self) {
        // Fails only if the task is already gone
        let _ = self.stop_tx.send(true);

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!("Janitor task ended abnormally: {}", err);
            }
            info!("Janitor stopped");
        }
    }

    /// Returns true while the sweep task is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
            debug!("Janitor aborted");
        }
    }
}

async fn run(shards: Arc<ShardSet>, interval: Duration, mut stop_rx: watch::Receiver<bool>) {
    info!(
        "Starting expiry janitor with interval of {:?} over {} shards",
        interval,
        shards.shards().len()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = shards.sweep(Instant::now());
                if removed > 0 {
                    info!("Expiry sweep: removed {} expired entries", removed);
                } else {
                    debug!("Expiry sweep: no expired entries found");
                }
            }
            _ = stop_rx.changed() => break,
        }
    }
}
