use super::model::round3;

/// Default simulated seconds per tick.
pub const TICK_SECONDS: f64 = 0.1;

/// Simulated elapsed time advancing by a fixed increment per tick.
///
/// Time is kept as a tick count and derived on read, so a long run never
/// accumulates floating-point drift.
///
/// # Examples
///
/// ```
/// use pi_energy_sim::sim::clock::SimulationClock;
///
/// let mut clock = SimulationClock::new(0.1);
/// let mut stamps = Vec::new();
/// for _ in 0..3 {
///     stamps.push(clock.advance());
/// }
/// assert_eq!(stamps, vec![0.0, 0.1, 0.2]);
/// assert_eq!(clock.elapsed(), 0.3);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Ticks taken since the last reset
    ticks: u64,
    /// Simulated seconds per tick
    increment: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(TICK_SECONDS)
    }
}

impl SimulationClock {
    /// Creates a clock at zero.
    ///
    /// # Arguments
    ///
    /// * `increment` - Simulated seconds added by each tick
    pub fn new(increment: f64) -> Self {
        Self {
            ticks: 0,
            increment,
        }
    }

    /// Elapsed simulated seconds, rounded to three decimals.
    pub fn elapsed(&self) -> f64 {
        round3(self.ticks as f64 * self.increment)
    }

    /// Number of ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds added per tick.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Advances by one increment.
    ///
    /// # Returns
    ///
    /// The elapsed time before advancing, which stamps the tick's sample.
    pub fn advance(&mut self) -> f64 {
        let started_at = self.elapsed();
        self.ticks += 1;
        started_at
    }

    /// Returns the clock to zero.
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}
