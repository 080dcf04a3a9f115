//! Core simulation types: parameters, control ranges, samples, run state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Slider-style input constraint: clamp to `[min, max]` and snap to `step`.
///
/// # Examples
///
/// ```
/// use pi_energy_sim::sim::types::VOLTAGE_RANGE;
///
/// assert_eq!(VOLTAGE_RANGE.constrain(3.34), 3.3);
/// assert_eq!(VOLTAGE_RANGE.constrain(9.0), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Supply voltage control (V).
pub const VOLTAGE_RANGE: ControlRange = ControlRange {
    min: 1.8,
    max: 5.0,
    step: 0.1,
};

/// Load resistance control (Ω).
pub const RESISTANCE_RANGE: ControlRange = ControlRange {
    min: 100.0,
    max: 10_000.0,
    step: 100.0,
};

impl ControlRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps `value` into range and snaps it to the nearest step from `min`.
    ///
    /// Non-finite input falls back to `min`.
    pub fn constrain(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).min(self.max);
        // Strip representation noise so 1.8 + 15 * 0.1 reads back as 3.3.
        (snapped * 1e6).round() / 1e6
    }

    /// Moves `value` by `delta` whole steps, staying in range.
    pub fn nudge(&self, value: f64, delta: i32) -> f64 {
        self.constrain(value + f64::from(delta) * self.step)
    }
}

/// User-controlled inputs read by every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Supply voltage (V).
    pub voltage: f64,
    /// Load resistance (Ω).
    pub resistance: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            voltage: 3.3,
            resistance: 1000.0,
        }
    }
}

impl SimulationParameters {
    /// Builds parameters with both values passed through their control range.
    pub fn constrained(voltage: f64, resistance: f64) -> Self {
        Self {
            voltage: VOLTAGE_RANGE.constrain(voltage),
            resistance: RESISTANCE_RANGE.constrain(resistance),
        }
    }
}

/// One recorded point of the energy readout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Simulated time at the start of the tick (s).
    pub time: f64,
    /// Noisy supply voltage (V).
    pub voltage: f64,
    /// Noisy current (mA).
    pub current_ma: f64,
    /// Noisy power (mW).
    pub power_mw: f64,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>7.1}s | V={:>6.3} V  I={:>8.3} mA  P={:>8.3} mW",
            self.time, self.voltage, self.current_ma, self.power_mw,
        )
    }
}

/// Whether ticks are being produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "STOPPED",
            Self::Running => "RUNNING",
        })
    }
}
