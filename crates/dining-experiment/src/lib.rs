//! Dining experiment harness: drives the table kernel from a CLI and turns
//! collected reports into serializable results.

pub mod results;

pub use results::{PhilosopherTally, RunConfig, SimulationResult};
