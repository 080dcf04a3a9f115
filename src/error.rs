//! Error types for the energy simulator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for configuration, GPIO addressing and export.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pin number outside the simulated GPIO header.
    #[error("GPIO pin {0} does not exist (expected 2..=27)")]
    InvalidPin(u8),

    /// Saving the CSV document failed at the file boundary.
    #[error("export failed: cannot write \"{}\": {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV encoding failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Any other I/O failure (terminal, socket).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
