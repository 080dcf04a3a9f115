//! Post-hoc statistics over the retained history.

use std::fmt;

use rand::Rng;

use super::engine::Simulation;
use super::types::Sample;

/// Mean, minimum and maximum of one measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stat {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Stat {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if n == 0 {
            return Self::default();
        }
        Self {
            mean: sum / n as f64,
            min,
            max,
        }
    }
}

/// Aggregate view of a run, computed from the history buffer.
///
/// Only retained samples contribute; evicted ones are gone.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Ticks taken since the last reset.
    pub ticks: u64,
    /// Simulated seconds elapsed.
    pub elapsed: f64,
    /// Samples currently retained.
    pub samples: usize,
    pub voltage: Stat,
    pub current_ma: Stat,
    pub power_mw: Stat,
    /// Pins asserted at the time of the summary.
    pub asserted_pins: usize,
}

impl RunSummary {
    pub fn from_simulation<R: Rng>(sim: &Simulation<R>) -> Self {
        let history = sim.history();
        let stat = |f: fn(&Sample) -> f64| Stat::over(history.iter().map(f));
        Self {
            ticks: sim.clock().ticks(),
            elapsed: sim.time(),
            samples: history.len(),
            voltage: stat(|s| s.voltage),
            current_ma: stat(|s| s.current_ma),
            power_mw: stat(|s| s.power_mw),
            asserted_pins: sim.gpio().asserted_count(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(
            f,
            "Ticks:          {} ({:.1} s simulated, {} retained)",
            self.ticks, self.elapsed, self.samples
        )?;
        for (label, unit, s) in [
            ("Voltage:", "V", self.voltage),
            ("Current:", "mA", self.current_ma),
            ("Power:", "mW", self.power_mw),
        ] {
            writeln!(
                f,
                "{label:<15} mean {:.3} {unit} (min {:.3}, max {:.3})",
                s.mean, s.min, s.max
            )?;
        }
        write!(f, "GPIO asserted:  {} / 26", self.asserted_pins)
    }
}
