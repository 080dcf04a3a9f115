//! TOML-based simulation configuration and preset definitions.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::history::HISTORY_CAPACITY;
use crate::sim::noise::{Jitter, NoiseModel};
use crate::sim::types::{RESISTANCE_RANGE, VOLTAGE_RANGE};

/// Smallest simulated tick the clock can tell apart.
pub const MIN_TICK_SECONDS: f64 = 0.001;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`SimulationConfig::from_toml_file`] or pick a built-in preset with
/// [`SimulationConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timing, seeding and buffer size.
    #[serde(default)]
    pub simulation: TimingConfig,
    /// Initial voltage and resistance.
    #[serde(default)]
    pub parameters: ParametersConfig,
    /// Jitter applied to each recorded quantity.
    #[serde(default)]
    pub noise: NoiseConfig,
    /// Random pin flip behaviour.
    #[serde(default)]
    pub gpio: GpioConfig,
}

/// Timing, seeding and buffer size.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Random seed; absent means OS entropy (not reproducible).
    pub seed: Option<u64>,
    /// Real-time tick period in milliseconds (must be > 0).
    pub tick_ms: u64,
    /// Simulated seconds per tick (at least [`MIN_TICK_SECONDS`]).
    pub tick_seconds: f64,
    /// Number of samples kept in the history window (must be > 0).
    pub history_capacity: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: 100,
            tick_seconds: 0.1,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl TimingConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Initial voltage and resistance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParametersConfig {
    /// Supply voltage (V), within 1.8..=5.0.
    pub voltage: f64,
    /// Load resistance (Ω), within 100..=10000.
    pub resistance: f64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            voltage: 3.3,
            resistance: 1000.0,
        }
    }
}

/// Jitter spans. Voltage is absolute, current and power relative.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Full voltage jitter span (V); offsets lie within half of it.
    pub voltage_jitter_v: f64,
    /// Full current jitter span as a fraction of the ideal current.
    pub current_jitter_ratio: f64,
    /// Full power jitter span as a fraction of the ideal power.
    pub power_jitter_ratio: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            voltage_jitter_v: 0.1,
            current_jitter_ratio: 0.05,
            power_jitter_ratio: 0.05,
        }
    }
}

impl NoiseConfig {
    pub fn model(&self) -> NoiseModel {
        NoiseModel {
            voltage: Jitter::Absolute(self.voltage_jitter_v),
            current: Jitter::Relative(self.current_jitter_ratio),
            power: Jitter::Relative(self.power_jitter_ratio),
        }
    }
}

/// Random pin flip behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpioConfig {
    /// Uniform draws above this value assert the chosen pin (0.0-1.0).
    pub assert_threshold: f64,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            assert_threshold: 0.7,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"parameters.voltage"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl SimulationConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "low_power", "high_load"];

    /// 3.3 V across 1 kΩ.
    pub fn default_preset() -> Self {
        Self::default()
    }

    /// Lowest supply into the largest load.
    pub fn low_power() -> Self {
        Self {
            parameters: ParametersConfig {
                voltage: 1.8,
                resistance: 10_000.0,
            },
            ..Self::default()
        }
    }

    /// Highest supply into the smallest load, with a noisier rail.
    pub fn high_load() -> Self {
        Self {
            parameters: ParametersConfig {
                voltage: 5.0,
                resistance: 100.0,
            },
            noise: NoiseConfig {
                voltage_jitter_v: 0.2,
                ..NoiseConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "low_power" => Ok(Self::low_power()),
            "high_load" => Ok(Self::high_load()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.tick_ms == 0 {
            errors.push(ConfigError::new("simulation.tick_ms", "must be > 0"));
        }
        // Recorded times keep three decimals; a shorter tick would repeat them.
        if !(s.tick_seconds >= MIN_TICK_SECONDS && s.tick_seconds.is_finite()) {
            errors.push(ConfigError::new(
                "simulation.tick_seconds",
                format!("must be >= {MIN_TICK_SECONDS}"),
            ));
        }
        if s.history_capacity == 0 {
            errors.push(ConfigError::new(
                "simulation.history_capacity",
                "must be > 0",
            ));
        }

        let p = &self.parameters;
        if !VOLTAGE_RANGE.contains(p.voltage) {
            errors.push(ConfigError::new(
                "parameters.voltage",
                format!(
                    "must be in [{}, {}], got {}",
                    VOLTAGE_RANGE.min, VOLTAGE_RANGE.max, p.voltage
                ),
            ));
        }
        if !RESISTANCE_RANGE.contains(p.resistance) {
            errors.push(ConfigError::new(
                "parameters.resistance",
                format!(
                    "must be in [{}, {}], got {}",
                    RESISTANCE_RANGE.min, RESISTANCE_RANGE.max, p.resistance
                ),
            ));
        }

        let n = &self.noise;
        for (field, value) in [
            ("noise.voltage_jitter_v", n.voltage_jitter_v),
            ("noise.current_jitter_ratio", n.current_jitter_ratio),
            ("noise.power_jitter_ratio", n.power_jitter_ratio),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        if !(0.0..=1.0).contains(&self.gpio.assert_threshold) {
            errors.push(ConfigError::new(
                "gpio.assert_threshold",
                "must be in [0.0, 1.0]",
            ));
        }

        errors
    }
}
