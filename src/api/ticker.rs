//! Background task driving a shared simulation's tick scheduler.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::handlers::lock;
use crate::sim::{SharedSimulation, TickScheduler};

/// Polls per tick period.
const POLLS_PER_PERIOD: u32 = 10;

/// Owns the ticker task; aborting happens on [`TickerHandle::cancel`] or drop.
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stops the task. Ticks already applied stay applied; none follow.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task polling a [`TickScheduler`] against `sim`.
///
/// Each poll holds the simulation lock for at most one tick, so user actions
/// taken through the same lock (pause, reset) are never interleaved with a
/// tick's mutations.
pub fn spawn_ticker(sim: SharedSimulation, period: Duration) -> TickerHandle {
    let task = tokio::spawn(async move {
        let mut scheduler = TickScheduler::new(period);
        let resolution = (scheduler.period() / POLLS_PER_PERIOD).max(Duration::from_millis(1));
        let mut interval = tokio::time::interval(resolution);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let mut guard = lock(&sim);
            scheduler.poll(&mut guard, Instant::now());
        }
    });
    TickerHandle { task }
}
