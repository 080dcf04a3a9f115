/// Simulated time keeping.
pub mod clock;
pub mod engine;
/// Simulated GPIO header.
pub mod gpio;
pub mod history;
/// Ohm's-law numeric model.
pub mod model;
pub mod noise;
pub mod scheduler;
pub mod summary;
pub mod types;

pub use engine::{SharedSimulation, Simulation};
pub use gpio::{GpioPin, GpioStateMap};
pub use history::HistoryBuffer;
pub use scheduler::TickScheduler;
pub use summary::RunSummary;
pub use types::{RunState, Sample, SimulationParameters};
