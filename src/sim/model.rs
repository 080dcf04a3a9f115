//! Ohm's-law numeric model.

/// Ideal electrical reading for one voltage/resistance pair, in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Current through the load (A).
    pub current_a: f64,
    /// Power dissipated in the load (W).
    pub power_w: f64,
}

impl Reading {
    /// Current in milliamps.
    pub fn current_ma(&self) -> f64 {
        self.current_a * 1000.0
    }

    /// Power in milliwatts.
    pub fn power_mw(&self) -> f64 {
        self.power_w * 1000.0
    }
}

/// Computes `I = V / R` and `P = V * I`.
///
/// `resistance` must be positive. The controls keep it in `[100, 10000]`;
/// this function does not check, so `R <= 0` yields infinite or negative values.
///
/// # Examples
///
/// ```
/// use pi_energy_sim::sim::model::ohms_law;
///
/// let r = ohms_law(3.3, 1000.0);
/// assert!((r.current_ma() - 3.3).abs() < 1e-9);
/// assert!((r.power_mw() - 10.89).abs() < 1e-9);
/// ```
pub fn ohms_law(voltage: f64, resistance: f64) -> Reading {
    let current_a = voltage / resistance;
    Reading {
        current_a,
        power_w: voltage * current_a,
    }
}

/// Rounds to three decimal places, the precision every recorded value is kept at.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
