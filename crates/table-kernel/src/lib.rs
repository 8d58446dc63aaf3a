//! Table kernel: the dining-philosophers simulation core.
//!
//! Models N philosophers seated around a ring of shared chopsticks:
//! - Each chopstick is a single-slot exclusive lock shared by exactly two
//!   neighboring philosophers
//! - Picking up both chopsticks races a hold timeout, breaking the
//!   hold-and-wait condition that would otherwise deadlock the ring
//! - A collector waits for every philosopher to finish and gathers their
//!   final meal tallies
//!
//! Livelock (a philosopher repeatedly losing the acquisition race) is a
//! tolerated probabilistic outcome, not an error; each report carries the
//! number of timed-out rounds so starvation pressure stays visible.

pub mod chopstick;
pub mod config;
pub mod philosopher;
pub mod table;

pub use chopstick::Chopstick;
pub use config::TableConfig;
pub use philosopher::{DiningReport, Philosopher};
pub use table::Table;
