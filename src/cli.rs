//! Command-line arguments and configuration resolution.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use pi_energy_sim::config::SimulationConfig;
use pi_energy_sim::error::Result;

/// Simulated Raspberry Pi energy readout
#[derive(Parser, Debug)]
#[command(name = "pi-energy-sim", author, version, about, long_about = None)]
pub struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (default, low_power, high_load)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the supply voltage (V)
    #[arg(long)]
    pub voltage: Option<f64>,

    /// Override the load resistance (Ω)
    #[arg(long)]
    pub resistance: Option<f64>,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 50)]
    pub ticks: u64,

    /// Pace headless ticks at the configured tick period
    #[arg(long)]
    pub realtime: bool,

    /// Write the history as CSV after the run
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Launch the interactive terminal dashboard
    #[cfg(feature = "tui")]
    #[arg(long)]
    pub tui: bool,

    /// Serve the REST API over a live simulation
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl Cli {
    /// Maximum log level for the `-v` count.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    #[cfg(feature = "tui")]
    pub fn tui_mode(&self) -> bool {
        self.tui
    }

    #[cfg(not(feature = "tui"))]
    pub fn tui_mode(&self) -> bool {
        false
    }

    /// Resolves the configuration: `--config`, then `--preset`, then the
    /// default preset, with command-line overrides applied on top.
    ///
    /// The result is not validated.
    pub fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = if let Some(path) = &self.config {
            SimulationConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            SimulationConfig::from_preset(name)?
        } else {
            SimulationConfig::default_preset()
        };

        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(voltage) = self.voltage {
            config.parameters.voltage = voltage;
        }
        if let Some(resistance) = self.resistance {
            config.parameters.resistance = resistance;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pi-energy-sim").chain(args.iter().copied()))
            .expect("parse should succeed")
    }

    #[test]
    fn defaults_to_default_preset() {
        let cli = parse(&[]);
        assert_eq!(cli.ticks, 50);
        assert_eq!(cli.log_level(), Level::WARN);
        let config = cli.load_config().expect("default preset");
        assert_eq!(config.parameters.voltage, 3.3);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let cli = parse(&[
            "--preset",
            "low_power",
            "--seed",
            "11",
            "--resistance",
            "2200",
            "-vv",
        ]);
        let config = cli.load_config().expect("preset");
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.parameters.voltage, 1.8);
        assert_eq!(config.parameters.resistance, 2200.0);
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn out_of_range_override_fails_validation() {
        let config = parse(&["--voltage", "9"]).load_config().expect("parse");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "parameters.voltage");
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(parse(&["--preset", "nope"]).load_config().is_err());
    }

    #[test]
    fn config_and_preset_conflict() {
        let result = Cli::try_parse_from(["pi-energy-sim", "--config", "a.toml", "--preset", "default"]);
        assert!(result.is_err());
    }
}
