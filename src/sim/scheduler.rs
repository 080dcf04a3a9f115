//! Periodic tick scheduling.
//!
//! [`TickScheduler`] is a cancellable recurring task driven by polling: the
//! owner calls [`TickScheduler::poll`] from its event loop with the current
//! instant, and at most one tick fires per elapsed period. Cancellation is
//! tied to the simulation's run epoch, so a pause or reset takes effect
//! immediately and a deadline armed before it can never fire afterwards.

use std::time::{Duration, Instant};

use rand::Rng;

use super::engine::Simulation;
use super::types::Sample;

/// Real-time period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct Armed {
    epoch: u64,
    next_due: Instant,
}

/// Fixed-period tick driver for a [`Simulation`].
#[derive(Debug, Clone)]
pub struct TickScheduler {
    period: Duration,
    armed: Option<Armed>,
    fired: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl TickScheduler {
    /// Creates an idle scheduler firing every `period` (minimum 1 ms).
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            armed: None,
            fired: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Total ticks fired by this scheduler.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Drops any pending deadline.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Fires a tick on `sim` if one is due at `now`.
    ///
    /// The first poll that sees a running simulation arms the first deadline
    /// one period later. A stopped simulation, or one whose run epoch changed
    /// since arming, cancels the pending deadline instead of firing it.
    pub fn poll<R: Rng>(&mut self, sim: &mut Simulation<R>, now: Instant) -> Option<Sample> {
        if !sim.is_running() {
            self.cancel();
            return None;
        }

        let epoch = sim.epoch();
        let armed = match self.armed {
            Some(armed) if armed.epoch == epoch => armed,
            _ => {
                self.armed = Some(Armed {
                    epoch,
                    next_due: now + self.period,
                });
                return None;
            }
        };

        if now < armed.next_due {
            return None;
        }

        // Deadlines stay on the original grid; missed periods are skipped
        // rather than replayed in a burst.
        let mut next_due = armed.next_due + self.period;
        if next_due <= now {
            let behind = (now - next_due).as_nanos() / self.period.as_nanos() + 1;
            next_due += self.period * u32::try_from(behind).unwrap_or(u32::MAX);
        }
        self.armed = Some(Armed { epoch, next_due });
        let sample = sim.tick();
        if sample.is_some() {
            self.fired += 1;
        }
        sample
    }

    /// Time left until the pending deadline, or `None` when idle.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.armed
            .map(|armed| armed.next_due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = Duration::from_millis(100);

    #[test]
    fn idle_while_stopped() {
        let mut sim = Simulation::seeded(1);
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();
        assert!(sched.poll(&mut sim, t0).is_none());
        assert!(sched.poll(&mut sim, t0 + P * 5).is_none());
        assert!(!sched.is_armed());
        assert!(sim.history().is_empty());
    }

    #[test]
    fn fires_once_per_period() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();

        assert!(sched.poll(&mut sim, t0).is_none());
        assert_eq!(sched.time_until_next(t0), Some(P));
        assert!(sched.poll(&mut sim, t0 + P / 2).is_none());
        assert!(sched.poll(&mut sim, t0 + P).is_some());
        assert!(sched.poll(&mut sim, t0 + P + P / 2).is_none());
        assert!(sched.poll(&mut sim, t0 + P * 2).is_some());
        assert_eq!(sched.fired(), 2);
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn late_poll_does_not_burst() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();
        sched.poll(&mut sim, t0);
        assert!(sched.poll(&mut sim, t0 + P * 10).is_some());
        assert!(sched.poll(&mut sim, t0 + P * 10).is_none());
        assert_eq!(sim.history().len(), 1);
    }

    #[test]
    fn late_polls_keep_the_period_grid() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();
        sched.poll(&mut sim, t0);
        assert!(sched.poll(&mut sim, t0 + P + Duration::from_millis(1)).is_some());
        assert_eq!(
            sched.time_until_next(t0 + P + Duration::from_millis(1)),
            Some(Duration::from_millis(99))
        );
        assert!(sched.poll(&mut sim, t0 + P * 2 + Duration::from_micros(500)).is_some());
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn skipped_periods_land_on_the_grid() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();
        sched.poll(&mut sim, t0);
        let late = t0 + P * 3 + Duration::from_millis(40);
        assert!(sched.poll(&mut sim, late).is_some());
        assert_eq!(sched.time_until_next(late), Some(Duration::from_millis(60)));
    }

    #[test]
    fn pause_cancels_pending_deadline() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();
        sched.poll(&mut sim, t0);
        sim.pause();
        assert!(sched.poll(&mut sim, t0 + P).is_none());
        assert!(!sched.is_armed());
        assert!(sim.history().is_empty());
    }

    #[test]
    fn reset_and_restart_between_polls_rearms() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        let mut sched = TickScheduler::new(P);
        let t0 = Instant::now();
        sched.poll(&mut sim, t0);

        // The scheduler never observes the stopped state.
        sim.reset();
        sim.start();

        assert!(sched.poll(&mut sim, t0 + P).is_none());
        assert!(sim.history().is_empty());
        assert_eq!(sched.time_until_next(t0 + P), Some(P));
        assert!(sched.poll(&mut sim, t0 + P * 2).is_some());
    }
}
