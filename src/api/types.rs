//! API response and request types.

use serde::{Deserialize, Serialize};

use crate::sim::gpio::GpioPin;
use crate::sim::{RunState, Sample, SimulationParameters, Simulation};

/// Snapshot of the live simulation.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// `"running"` or `"stopped"`.
    pub run_state: RunState,
    /// Elapsed simulated seconds.
    pub time: f64,
    /// Current voltage and resistance.
    pub parameters: SimulationParameters,
    /// Noise-free current and power for the current parameters.
    pub ideal: IdealReadout,
    /// Most recent sample, if any.
    pub latest_sample: Option<Sample>,
    /// Samples currently held in the history window.
    pub history_len: usize,
    /// Every header pin with its state.
    pub gpio: Vec<PinState>,
}

impl From<&Simulation> for StateResponse {
    fn from(sim: &Simulation) -> Self {
        let ideal = sim.ideal_readout();
        Self {
            run_state: sim.run_state(),
            time: sim.time(),
            parameters: sim.parameters(),
            ideal: IdealReadout {
                current_ma: ideal.current_ma(),
                power_mw: ideal.power_mw(),
            },
            latest_sample: sim.history().latest().copied(),
            history_len: sim.history().len(),
            gpio: pin_states(sim),
        }
    }
}

/// Ideal readout in milli-units.
#[derive(Debug, Serialize)]
pub struct IdealReadout {
    pub current_ma: f64,
    pub power_mw: f64,
}

/// One GPIO pin and whether it is asserted.
#[derive(Debug, Serialize)]
pub struct PinState {
    pub pin: GpioPin,
    pub asserted: bool,
}

/// All header pins of `sim`, in display order.
pub fn pin_states(sim: &Simulation) -> Vec<PinState> {
    sim.gpio()
        .snapshot()
        .into_iter()
        .map(|(pin, asserted)| PinState { pin, asserted })
        .collect()
}

/// Partial parameter update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParametersUpdate {
    pub voltage: Option<f64>,
    pub resistance: Option<f64>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_response_reflects_simulation() {
        let mut sim = Simulation::seeded(1);
        sim.start();
        sim.tick();
        let state = StateResponse::from(&sim);
        assert_eq!(state.run_state, RunState::Running);
        assert_eq!(state.history_len, 1);
        assert_eq!(state.gpio.len(), 26);
        assert!((state.ideal.current_ma - 3.3).abs() < 1e-9);
        assert!(state.latest_sample.is_some());
    }

    #[test]
    fn pin_state_serializes_plain_number() {
        let pin = PinState {
            pin: GpioPin::from_index(11),
            asserted: true,
        };
        let json = serde_json::to_string(&pin).unwrap_or_default();
        assert_eq!(json, r#"{"pin":13,"asserted":true}"#);
    }
}
