//! The once-per-second elapsed-time tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::clock::Clock;
use crate::session::elapsed_between;

/// Background task publishing whole elapsed seconds since `start_time`.
///
/// The task is aborted by [`ElapsedTimer::stop`] or when the timer is
/// dropped, so no periodic work outlives the form.
#[derive(Debug)]
pub struct ElapsedTimer {
    elapsed: watch::Receiver<u64>,
    task: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    /// Tick period.
    pub const PERIOD: Duration = Duration::from_secs(1);

    /// Spawns the tick task on the current tokio runtime.
    pub fn start(start_time: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = watch::channel(elapsed_between(start_time, clock.now()));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + Self::PERIOD, Self::PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let elapsed = elapsed_between(start_time, clock.now());
                tx.send_if_modified(|current| {
                    if elapsed > *current {
                        *current = elapsed;
                        true
                    } else {
                        false
                    }
                });
            }
        });

        tracing::debug!(%start_time, "elapsed timer started");

        Self {
            elapsed: rx,
            task: Some(task),
        }
    }

    /// Latest published elapsed seconds.
    pub fn current(&self) -> u64 {
        *self.elapsed.borrow()
    }

    /// A receiver notified whenever elapsed seconds change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the tick task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("elapsed timer stopped");
        }
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
