//! Energy simulator entry point: CLI wiring and mode dispatch.

mod cli;

use std::process;
use std::thread;
use std::time::Instant;

use clap::Parser;

use pi_energy_sim::config::SimulationConfig;
use pi_energy_sim::io::export::export_csv;
use pi_energy_sim::sim::{RunSummary, Simulation, TickScheduler};

use cli::Cli;

/// Runs `cli.ticks` ticks, printing each sample, then the summary.
fn run_headless(cli: &Cli, config: &SimulationConfig) -> Simulation {
    let mut sim = Simulation::from_config(config);
    sim.start();

    if cli.realtime {
        let mut scheduler = TickScheduler::new(config.simulation.tick_period());
        while scheduler.fired() < cli.ticks {
            let now = Instant::now();
            if let Some(sample) = scheduler.poll(&mut sim, now) {
                println!("{sample}");
                continue;
            }
            if let Some(wait) = scheduler.time_until_next(now) {
                thread::sleep(wait);
            }
        }
    } else {
        for _ in 0..cli.ticks {
            if let Some(sample) = sim.tick() {
                println!("{sample}");
            }
        }
    }

    sim.pause();
    println!("\n{}", RunSummary::from_simulation(&sim));
    sim
}

fn main() {
    let cli = Cli::parse();

    // The dashboard owns the terminal; logging there would corrupt the frame.
    if !cli.tui_mode() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(cli.log_level())
            .init();
    }

    let config = match cli.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        if let Err(e) = pi_energy_sim::tui::run(&config) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::{Arc, Mutex};

        let state = Arc::new(pi_energy_sim::api::AppState {
            simulation: Arc::new(Mutex::new(Simulation::from_config(&config))),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(pi_energy_sim::api::serve(
            state,
            addr,
            config.simulation.tick_period(),
        )) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
        return;
    }

    let sim = run_headless(&cli, &config);

    if let Some(path) = &cli.export {
        match export_csv(sim.history(), path) {
            Ok(rows) => eprintln!("Exported {rows} samples to {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }
}
