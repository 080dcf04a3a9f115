//! Simulation context: owns parameters, run state, clock, history and GPIO map.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::SimulationConfig;

use super::clock::SimulationClock;
use super::gpio::{GPIO_PINS, GpioPin, GpioStateMap};
use super::history::HistoryBuffer;
use super::model::{Reading, ohms_law, round3};
use super::noise::NoiseModel;
use super::types::{RESISTANCE_RANGE, RunState, Sample, SimulationParameters, VOLTAGE_RANGE};

/// Draws above this value assert the randomly chosen pin.
pub const GPIO_ASSERT_THRESHOLD: f64 = 0.7;

/// The single mutable simulation context.
///
/// Generic over the random source so tests can inject a seeded or fixed
/// generator. Every mutation goes through `&mut self`; callers that share it
/// across threads wrap it in one mutex (see [`SharedSimulation`]).
pub struct Simulation<R: Rng = StdRng> {
    params: SimulationParameters,
    run_state: RunState,
    /// Bumped on every run-state transition so schedulers can drop stale deadlines.
    epoch: u64,
    clock: SimulationClock,
    history: HistoryBuffer,
    gpio: GpioStateMap,
    noise: NoiseModel,
    assert_threshold: f64,
    rng: R,
}

/// Thread-shared simulation guarded by a single lock.
pub type SharedSimulation = std::sync::Arc<std::sync::Mutex<Simulation>>;

impl Simulation<StdRng> {
    /// Creates a simulation with default settings and a reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Builds a simulation from a validated configuration.
    ///
    /// Uses `simulation.seed` when present, OS entropy otherwise.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::from_config_with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation with default settings around `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            params: SimulationParameters::default(),
            run_state: RunState::Stopped,
            epoch: 0,
            clock: SimulationClock::default(),
            history: HistoryBuffer::default(),
            gpio: GpioStateMap::new(),
            noise: NoiseModel::default(),
            assert_threshold: GPIO_ASSERT_THRESHOLD,
            rng,
        }
    }

    /// Builds a simulation from `config` around an explicit generator.
    pub fn from_config_with_rng(config: &SimulationConfig, rng: R) -> Self {
        let mut sim = Self::with_rng(rng);
        sim.params = SimulationParameters::constrained(
            config.parameters.voltage,
            config.parameters.resistance,
        );
        sim.clock = SimulationClock::new(config.simulation.tick_seconds);
        sim.history = HistoryBuffer::with_capacity(config.simulation.history_capacity);
        sim.noise = config.noise.model();
        sim.assert_threshold = config.gpio.assert_threshold;
        sim
    }

    /// Replaces the noise model.
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    // ---- run state ----

    /// Stopped → Running. No-op when already running.
    pub fn start(&mut self) {
        if self.run_state == RunState::Running {
            return;
        }
        self.set_run_state(RunState::Running);
        info!(time = self.clock.elapsed(), "simulation started");
    }

    /// Running → Stopped, keeping all recorded state.
    pub fn pause(&mut self) {
        if self.run_state == RunState::Stopped {
            return;
        }
        self.set_run_state(RunState::Stopped);
        info!(
            time = self.clock.elapsed(),
            samples = self.history.len(),
            "simulation paused"
        );
    }

    /// Start/pause toggle.
    pub fn toggle_running(&mut self) -> RunState {
        match self.run_state {
            RunState::Running => self.pause(),
            RunState::Stopped => self.start(),
        }
        self.run_state
    }

    /// Stops and clears the clock, history and GPIO map, from any state.
    pub fn reset(&mut self) {
        self.set_run_state(RunState::Stopped);
        self.clock.reset();
        self.history.clear();
        self.gpio.clear();
        info!("simulation reset");
    }

    // User holds cover a single tick of one run and never carry across a
    // transition.
    fn set_run_state(&mut self, state: RunState) {
        self.run_state = state;
        self.epoch = self.epoch.wrapping_add(1);
        self.gpio.release_held();
    }

    // ---- tick ----

    /// Runs one tick if running.
    ///
    /// # Returns
    ///
    /// The recorded sample, or `None` when stopped (nothing is mutated).
    pub fn tick(&mut self) -> Option<Sample> {
        if self.run_state != RunState::Running {
            return None;
        }

        // 1. Advance the clock; the sample carries the tick's start time
        let time = self.clock.advance();

        // 2. Ideal values
        let ideal = ohms_law(self.params.voltage, self.params.resistance);

        // 3. Independent noise per quantity
        let voltage = self.noise.voltage.apply(self.params.voltage, &mut self.rng);
        let current_a = self.noise.current.apply(ideal.current_a, &mut self.rng);
        let power_w = self.noise.power.apply(ideal.power_w, &mut self.rng);

        // 4. Round and convert to milli-units
        let sample = Sample {
            time,
            voltage: round3(voltage),
            current_ma: round3(current_a * 1000.0),
            power_mw: round3(power_w * 1000.0),
        };

        // 5. Append, evicting the oldest beyond capacity
        self.history.push(sample);

        // 6. Random pin flip; user-held pins keep the user's value
        let pin = GpioPin::from_index(self.rng.random_range(0..GPIO_PINS.len()));
        let asserted = self.rng.random::<f64>() > self.assert_threshold;
        let applied = self.gpio.write_random(pin, asserted);
        self.gpio.release_held();

        trace!(
            time,
            voltage = sample.voltage,
            current_ma = sample.current_ma,
            power_mw = sample.power_mw,
            %pin,
            asserted,
            applied,
            "tick"
        );
        Some(sample)
    }

    // ---- user input ----

    /// Sets the supply voltage, constrained to the voltage control. Returns the applied value.
    pub fn set_voltage(&mut self, voltage: f64) -> f64 {
        self.params.voltage = VOLTAGE_RANGE.constrain(voltage);
        debug!(voltage = self.params.voltage, "voltage set");
        self.params.voltage
    }

    /// Sets the load resistance, constrained to the resistance control. Returns the applied value.
    pub fn set_resistance(&mut self, resistance: f64) -> f64 {
        self.params.resistance = RESISTANCE_RANGE.constrain(resistance);
        debug!(resistance = self.params.resistance, "resistance set");
        self.params.resistance
    }

    /// Moves the voltage by whole control steps.
    pub fn nudge_voltage(&mut self, steps: i32) -> f64 {
        self.set_voltage(VOLTAGE_RANGE.nudge(self.params.voltage, steps))
    }

    /// Moves the resistance by whole control steps.
    pub fn nudge_resistance(&mut self, steps: i32) -> f64 {
        self.set_resistance(RESISTANCE_RANGE.nudge(self.params.resistance, steps))
    }

    /// Manually flips a pin; returns its new state.
    pub fn toggle_pin(&mut self, pin: GpioPin) -> bool {
        let state = self.gpio.toggle(pin);
        debug!(%pin, state, "pin toggled");
        state
    }

    /// Manually drives a pin.
    pub fn set_pin(&mut self, pin: GpioPin, asserted: bool) {
        self.gpio.write_manual(pin, asserted);
        debug!(%pin, asserted, "pin set");
    }

    // ---- read-only views ----

    pub fn parameters(&self) -> SimulationParameters {
        self.params
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Run-state generation counter.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Elapsed simulated seconds.
    pub fn time(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn gpio(&self) -> &GpioStateMap {
        &self.gpio
    }

    pub fn noise(&self) -> &NoiseModel {
        &self.noise
    }

    /// Noise-free reading for the current parameters.
    pub fn ideal_readout(&self) -> Reading {
        ohms_law(self.params.voltage, self.params.resistance)
    }
}
