//! Simulated Raspberry Pi energy readout with a randomly driven GPIO header.

/// REST API over a live simulation.
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
/// Simulation core: numeric model, noise, clock, history, GPIO and scheduling.
pub mod sim;
/// Live terminal dashboard.
#[cfg(feature = "tui")]
pub mod tui;

pub use error::{Error, Result};
