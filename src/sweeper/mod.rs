//! Retention sweeper
//!
//! Periodic reclamation of the archive temp area. The sweep loop runs
//! on its own timer, outside any request path, and is owned by the host
//! runtime through a cancellable handle.

use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::archive::Archiver;

/// Handle to the periodic cleanup task.
///
/// Dropping the handle aborts the task; `stop` shuts it down
/// gracefully and waits for it to exit.
pub struct RetentionSweeper {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RetentionSweeper {
    /// Spawns the sweep loop on the current tokio runtime. A tick that
    /// fires while a sweep is still running is skipped rather than run
    /// concurrently, and each sweep runs on the blocking pool so the
    /// timer task never stalls on filesystem I/O.
    pub fn start(archiver: Arc<Archiver>, interval: Duration) -> Self {
        let (shutdown, mut observe) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // A tokio interval yields immediately on the first tick;
            // consume it so the first sweep lands one interval in.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let archiver = Arc::clone(&archiver);
                        match tokio::task::spawn_blocking(move || archiver.cleanup()).await {
                            Ok(_removed) => {}
                            Err(e) => error!("Retention sweep task failed: {}", e),
                        }
                    }
                    _ = observe.changed() => {
                        info!("Retention sweeper stopping");
                        return;
                    }
                }
            }
        });

        info!(
            "Retention sweeper started (interval {}s)",
            interval.as_secs()
        );
        Self {
            shutdown,
            task: Some(task),
        }
    }

    /// Signals the sweep loop to stop and waits for it to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RetentionSweeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
