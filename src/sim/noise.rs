//! Bounded uniform jitter applied to ideal readings.

use rand::Rng;

/// Width of the uniform perturbation window around a nominal value.
///
/// The offset is drawn from `[-span / 2, span / 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    /// Fixed span in the value's own unit.
    Absolute(f64),
    /// Span as a fraction of the nominal value.
    Relative(f64),
}

impl Jitter {
    /// Full span of the window for `nominal`.
    pub fn span(&self, nominal: f64) -> f64 {
        match *self {
            Self::Absolute(span) => span,
            Self::Relative(fraction) => nominal * fraction,
        }
    }

    /// Largest absolute offset this jitter can add to `nominal`.
    pub fn max_offset(&self, nominal: f64) -> f64 {
        self.span(nominal).abs() / 2.0
    }

    /// Returns `nominal` perturbed by one uniform draw from `rng`.
    pub fn apply<R: Rng>(&self, nominal: f64, rng: &mut R) -> f64 {
        let u: f64 = rng.random();
        nominal + (u - 0.5) * self.span(nominal)
    }
}

/// Jitter settings for the three recorded quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    pub voltage: Jitter,
    pub current: Jitter,
    pub power: Jitter,
}

impl Default for NoiseModel {
    /// ±0.05 V on voltage, ±2.5 % on current and power.
    fn default() -> Self {
        Self {
            voltage: Jitter::Absolute(0.1),
            current: Jitter::Relative(0.05),
            power: Jitter::Relative(0.05),
        }
    }
}

impl NoiseModel {
    /// A model that leaves every value untouched.
    pub fn silent() -> Self {
        Self {
            voltage: Jitter::Absolute(0.0),
            current: Jitter::Relative(0.0),
            power: Jitter::Relative(0.0),
        }
    }
}
