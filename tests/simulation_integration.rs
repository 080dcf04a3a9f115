//! End-to-end behaviour of the tick loop, history and GPIO header.

mod common;

use std::time::{Duration, Instant};

use pi_energy_sim::config::{MIN_TICK_SECONDS, SimulationConfig};
use pi_energy_sim::sim::gpio::GPIO_PINS;
use pi_energy_sim::sim::history::HISTORY_CAPACITY;
use pi_energy_sim::sim::scheduler::TICK_PERIOD;
use pi_energy_sim::sim::{GpioPin, RunState, Simulation, TickScheduler};

use common::{assert_close, quiet_sim, run_ticks, running_sim};

#[test]
fn first_sample_is_at_time_zero_and_steps_by_a_tenth() {
    let mut sim = running_sim(1);
    let samples = run_ticks(&mut sim, 5);
    let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0.0, 0.1, 0.2, 0.3, 0.4]);
    assert_eq!(sim.time(), 0.5);
}

#[test]
fn history_keeps_the_latest_hundred_samples() {
    let mut sim = running_sim(2);
    run_ticks(&mut sim, 150);

    let history = sim.history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    let times: Vec<f64> = history.iter().map(|s| s.time).collect();
    assert_eq!(times[0], 5.0);
    assert_eq!(times[HISTORY_CAPACITY - 1], 14.9);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn long_runs_do_not_drift() {
    let mut sim = running_sim(3);
    run_ticks(&mut sim, 10_000);
    assert_eq!(sim.time(), 1000.0);
    assert_eq!(sim.history().latest().map(|s| s.time), Some(999.9));
}

#[test]
fn noise_stays_within_bounds() {
    let mut sim = running_sim(4);
    for sample in run_ticks(&mut sim, 500) {
        assert_close(sample.voltage, 3.3, 0.05 + 5e-4);
        assert_close(sample.current_ma, 3.3, 3.3 * 0.025 + 5e-4);
        assert_close(sample.power_mw, 10.89, 10.89 * 0.025 + 5e-4);
    }
}

#[test]
fn parameter_changes_apply_on_the_next_tick() {
    let mut sim = quiet_sim();
    let before = sim.tick().expect("running");
    assert_eq!(before.current_ma, 3.3);

    sim.set_voltage(5.0);
    sim.set_resistance(100.0);
    let after = sim.tick().expect("running");
    assert_eq!(after.voltage, 5.0);
    assert_eq!(after.current_ma, 50.0);
    assert_eq!(after.power_mw, 250.0);
    assert_eq!(sim.history().len(), 2);
}

#[test]
fn out_of_range_inputs_are_constrained() {
    let mut sim = quiet_sim();
    assert_eq!(sim.set_voltage(12.0), 5.0);
    assert_eq!(sim.set_resistance(1.0), 100.0);
    assert_eq!(sim.set_voltage(3.34), 3.3);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let mut sim = running_sim(5);
    run_ticks(&mut sim, 3);
    sim.pause();
    assert_eq!(sim.run_state(), RunState::Stopped);
    assert!(sim.tick().is_none());
    assert_eq!(sim.history().len(), 3);

    sim.start();
    let next = sim.tick().expect("running again");
    assert_close(next.time, 0.3, 1e-12);
}

#[test]
fn reset_clears_everything() {
    let mut sim = running_sim(6);
    run_ticks(&mut sim, 40);
    sim.toggle_pin(GpioPin::new(4).expect("valid pin"));
    sim.reset();

    assert_eq!(sim.run_state(), RunState::Stopped);
    assert_eq!(sim.time(), 0.0);
    assert!(sim.history().is_empty());
    assert_eq!(sim.gpio().written(), 0);
    assert!(sim.gpio().snapshot().iter().all(|&(_, on)| !on));
}

#[test]
fn gpio_flips_only_touch_header_pins() {
    let mut sim = running_sim(7);
    run_ticks(&mut sim, 300);
    let gpio = sim.gpio();
    assert!(gpio.written() > 0);
    assert!(gpio.written() <= GPIO_PINS.len());
    assert!(GpioPin::new(1).is_err());
    assert!(GpioPin::new(28).is_err());
}

#[test]
fn same_seed_same_run() {
    let mut a = Simulation::seeded(99);
    let mut b = Simulation::seeded(99);
    a.start();
    b.start();
    assert_eq!(
        (0..50).map(|_| a.tick()).collect::<Vec<_>>(),
        (0..50).map(|_| b.tick()).collect::<Vec<_>>()
    );
    assert_eq!(a.gpio().snapshot(), b.gpio().snapshot());
}

#[test]
fn scheduler_fires_once_per_period() {
    let mut sim = running_sim(8);
    let mut scheduler = TickScheduler::new(TICK_PERIOD);
    let t0 = Instant::now();
    assert!(scheduler.poll(&mut sim, t0).is_none());

    for k in 1..=10u32 {
        let now = t0 + TICK_PERIOD * k;
        assert!(scheduler.poll(&mut sim, now).is_some());
        assert!(scheduler.poll(&mut sim, now + Duration::from_millis(10)).is_none());
    }
    assert_eq!(sim.history().len(), 10);
    assert_eq!(scheduler.fired(), 10);
}

#[test]
fn scheduler_skips_missed_periods() {
    let mut sim = running_sim(9);
    let mut scheduler = TickScheduler::new(TICK_PERIOD);
    let t0 = Instant::now();
    scheduler.poll(&mut sim, t0);
    scheduler.poll(&mut sim, t0 + Duration::from_secs(1));
    assert_eq!(sim.history().len(), 1);
}

#[test]
fn pending_tick_is_dropped_after_pause_and_restart() {
    let mut sim = running_sim(10);
    let mut scheduler = TickScheduler::new(TICK_PERIOD);
    let t0 = Instant::now();
    scheduler.poll(&mut sim, t0);

    sim.pause();
    sim.start();
    // The deadline armed before the pause belongs to the old run.
    assert!(scheduler.poll(&mut sim, t0 + TICK_PERIOD).is_none());
    assert!(sim.history().is_empty());
    assert!(scheduler.poll(&mut sim, t0 + TICK_PERIOD * 2).is_some());
}

#[test]
fn random_flips_assert_about_thirty_percent_across_all_pins() {
    const RUNS: u64 = 10_000;
    let mut per_pin = [0u32; GPIO_PINS.len()];
    let mut asserted = 0u32;

    for seed in 0..RUNS {
        let mut sim = running_sim(seed);
        sim.tick();
        assert_eq!(sim.gpio().written(), 1);
        for (pin, on) in sim.gpio().snapshot() {
            if on {
                asserted += 1;
                per_pin[pin.index()] += 1;
            }
        }
    }

    let fraction = f64::from(asserted) / RUNS as f64;
    assert!((0.27..=0.33).contains(&fraction), "asserted fraction {fraction}");
    // ~115 expected per pin.
    for (i, &count) in per_pin.iter().enumerate() {
        assert!((60..=180).contains(&count), "GPIO{} asserted {count} times", GPIO_PINS[i]);
    }
}

#[test]
fn millisecond_ticks_keep_times_increasing() {
    let mut config = SimulationConfig::default();
    config.simulation.seed = Some(1);
    config.simulation.tick_seconds = MIN_TICK_SECONDS;
    assert!(config.validate().is_empty());

    let mut sim = Simulation::from_config(&config);
    sim.start();
    let samples = run_ticks(&mut sim, 2_000);
    assert!(samples.windows(2).all(|w| w[0].time < w[1].time));
    assert_eq!(sim.time(), 2.0);
}
