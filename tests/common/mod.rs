//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use pi_energy_sim::sim::noise::NoiseModel;
use pi_energy_sim::sim::{Sample, Simulation};

/// Seeded simulation, already running.
pub fn running_sim(seed: u64) -> Simulation {
    let mut sim = Simulation::seeded(seed);
    sim.start();
    sim
}

/// Running simulation whose samples equal the ideal readout.
pub fn quiet_sim() -> Simulation {
    let mut sim = Simulation::seeded(42).with_noise(NoiseModel::silent());
    sim.start();
    sim
}

/// Ticks `sim` `n` times and returns the samples produced.
pub fn run_ticks(sim: &mut Simulation, n: usize) -> Vec<Sample> {
    (0..n).filter_map(|_| sim.tick()).collect()
}

/// Asserts two floats agree to within `eps`.
pub fn assert_close(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} ± {eps}, got {actual}"
    );
}
