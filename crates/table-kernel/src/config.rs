//! Policy parameters for the dining table.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and retry policy for a simulation run.
///
/// The exact durations are policy, not contract: the hold timeout only has to
/// be long enough for an uncontended acquisition to usually succeed, and short
/// enough to break a circular wait in bounded time. Defaults match the classic
/// one-second constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// How long a philosopher waits for the neighbor's chopstick before
    /// putting its own back down (milliseconds).
    pub hold_timeout_ms: u64,

    /// Upper bound for a thinking pause (milliseconds). Each pause is drawn
    /// uniformly from `[0, max)`; zero skips the pause entirely.
    pub max_think_ms: u64,

    /// Upper bound for an eating pause (milliseconds).
    pub max_eat_ms: u64,

    /// Seed for the table RNG. `None` draws a seed from the OS, so every run
    /// is different; a fixed seed reproduces the target-meal assignment.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            hold_timeout_ms: 1000,
            max_think_ms: 1000,
            max_eat_ms: 1000,
            seed: None,
        }
    }
}

impl TableConfig {
    /// Hold timeout as a `Duration`.
    pub fn hold_timeout(&self) -> Duration {
        Duration::from_millis(self.hold_timeout_ms)
    }

    /// Thinking pause upper bound as a `Duration`.
    pub fn max_think(&self) -> Duration {
        Duration::from_millis(self.max_think_ms)
    }

    /// Eating pause upper bound as a `Duration`.
    pub fn max_eat(&self) -> Duration {
        Duration::from_millis(self.max_eat_ms)
    }
}
