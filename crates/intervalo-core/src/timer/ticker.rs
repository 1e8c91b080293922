//! Repeating tick source for driving a [`TimerEngine`](super::TimerEngine).
//!
//! A `Ticker` owns a background tokio task. Dropping the handle stops the
//! task, so a ticker held only for as long as the engine runs can never
//! deliver a tick after a pause or reset.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct Ticker {
    rx: mpsc::Receiver<u64>,
    handle: JoinHandle<()>,
    period: Duration,
}

impl Ticker {
    /// Spawn the tick task on the current tokio runtime.
    ///
    /// The first tick arrives one full period after this call. A zero
    /// period is raised to one millisecond.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately.
            interval.tick().await;
            let mut fired: u64 = 0;
            loop {
                interval.tick().await;
                fired += 1;
                if tx.send(fired).await.is_err() {
                    break;
                }
            }
        });
        Self { rx, handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next firing. Returns the 1-based firing count, or
    /// `None` if the task has ended.
    pub async fn next(&mut self) -> Option<u64> {
        self.rx.recv().await
    }

    /// Stop the task. Equivalent to dropping the ticker.
    pub fn stop(self) {}
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
