// ABOUTME: VibeScheduler - posts a random vibe through the registry right away
// ABOUTME: and then once per interval until stopped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::config::KEY_POST_INTERVAL;
use crate::error::ConfigError;
use crate::tool::Registry;
use crate::tools::PUBLISH_RANDOM_VIBE;

/// Periodic random-vibe poster.
pub struct VibeScheduler {
    registry: Registry,
    interval: Duration,
}

impl VibeScheduler {
    /// Fails on a zero interval, which the ticker cannot run with.
    pub fn new(registry: Registry, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: KEY_POST_INTERVAL.to_string(),
                message: "scheduler interval must be greater than zero".to_string(),
            });
        }
        Ok(Self { registry, interval })
    }

    /// Start posting on a background task.
    ///
    /// Dropping the returned handle without calling [`ScheduleHandle::stop`]
    /// also ends the loop at its next wake-up.
    pub fn spawn(self) -> ScheduleHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let runs = Arc::new(AtomicU64::new(0));
        let task_runs = Arc::clone(&runs);

        info!(interval = ?self.interval, "starting vibe scheduler");
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        let run = task_runs.fetch_add(1, Ordering::SeqCst) + 1;
                        match self
                            .registry
                            .execute(PUBLISH_RANDOM_VIBE, serde_json::json!({}))
                            .await
                        {
                            Ok(result) => info!(run, %result, "scheduled vibe posted"),
                            Err(e) => warn!(run, error = %e, "scheduled vibe failed"),
                        }
                    }
                }
            }
            info!("vibe scheduler stopped");
        });

        ScheduleHandle {
            stop_tx,
            task,
            runs,
        }
    }
}

/// Control handle for a running [`VibeScheduler`].
pub struct ScheduleHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    runs: Arc<AtomicU64>,
}

impl ScheduleHandle {
    /// Number of posting attempts made so far, successful or not.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Stop the loop and wait for the task to finish. An in-flight post
    /// completes before the loop observes the stop.
    pub async fn stop(self) -> u64 {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "vibe scheduler task ended abnormally");
        }
        self.runs.load(Ordering::SeqCst)
    }
}
