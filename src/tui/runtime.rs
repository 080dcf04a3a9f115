//! TUI application state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::SimulationConfig;
use crate::io::export::{EXPORT_FILE_NAME, export_csv};
use crate::sim::gpio::{GPIO_PINS, GpioPin};
use crate::sim::{Simulation, TickScheduler};

use super::board::BoardView;

/// Redraw interval while no tick is pending.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// TUI application state.
pub struct App {
    /// Simulation context (owned; the event loop is its only writer).
    pub sim: Simulation,
    /// Tick driver polled from the event loop.
    pub scheduler: TickScheduler,
    /// Cosmetic board renderer state.
    pub board: BoardView,
    /// Pin under the GPIO grid cursor.
    pub selected_pin: GpioPin,
    /// Last notification shown in the status line.
    pub status: Option<String>,
    /// Where `e` writes the export.
    pub export_path: PathBuf,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Creates an app from a validated configuration.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            sim: Simulation::from_config(config),
            scheduler: TickScheduler::new(config.simulation.tick_period()),
            board: BoardView::default(),
            selected_pin: GpioPin::from_index(0),
            status: None,
            export_path: PathBuf::from(EXPORT_FILE_NAME),
            quit: false,
        }
    }

    /// Advances the scheduler and the board animation for one frame.
    pub fn on_frame(&mut self, now: Instant) {
        self.scheduler.poll(&mut self.sim, now);
        self.board.advance();
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.scheduler
            .time_until_next(now)
            .map_or(FRAME_INTERVAL, |d| d.min(FRAME_INTERVAL))
    }

    /// Start/pause toggle.
    pub fn toggle_running(&mut self) {
        self.sim.toggle_running();
        self.status = None;
    }

    /// Stops and clears the simulation.
    pub fn reset(&mut self) {
        self.sim.reset();
        self.scheduler.cancel();
        self.status = Some("Simulation reset".to_string());
    }

    pub fn nudge_voltage(&mut self, steps: i32) {
        self.sim.nudge_voltage(steps);
    }

    pub fn nudge_resistance(&mut self, steps: i32) {
        self.sim.nudge_resistance(steps);
    }

    /// Moves the GPIO cursor by `delta` pins, wrapping around the header.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = GPIO_PINS.len() as isize;
        let next = (self.selected_pin.index() as isize + delta).rem_euclid(len);
        self.selected_pin = GpioPin::from_index(next as usize);
    }

    /// Toggles the pin under the cursor.
    pub fn toggle_selected_pin(&mut self) {
        let state = self.sim.toggle_pin(self.selected_pin);
        self.status = Some(format!(
            "{} {}",
            self.selected_pin,
            if state { "HIGH" } else { "LOW" }
        ));
    }

    /// Writes the history to [`App::export_path`]; failures only set the status line.
    pub fn export(&mut self) {
        self.status = Some(
            match export_csv(self.sim.history(), &self.export_path) {
                Ok(rows) => format!("Exported {rows} samples to {}", self.export_path.display()),
                Err(e) => e.to_string(),
            },
        );
    }
}
