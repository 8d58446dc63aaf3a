//! Results collection and output for dining simulations.
//!
//! Captures, per run:
//! - Who finished when (completion order)
//! - Final meal tallies in seating order
//! - Starvation pressure (timed-out acquisition rounds)

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use table_kernel::DiningReport;

/// Configuration summary embedded in a result record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of philosophers at the table
    pub philosophers: usize,
    /// Upper bound for the target-meal draw (`None` when targets were
    /// assigned explicitly)
    pub max_meals: Option<u32>,
    /// Chopstick hold timeout in milliseconds
    pub hold_timeout_ms: u64,
    /// Thinking pause upper bound in milliseconds
    pub max_think_ms: u64,
    /// Eating pause upper bound in milliseconds
    pub max_eat_ms: u64,
    /// Random seed (if reproducible)
    pub seed: Option<u64>,
}

/// Final tally for one philosopher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilosopherTally {
    /// Seat index around the table
    pub seat: usize,
    /// Philosopher name
    pub name: String,
    /// Meals assigned at seating
    pub target_meals: u32,
    /// Meals actually eaten
    pub meals_eaten: u32,
    /// Acquisition rounds that timed out waiting for the neighbor
    pub timed_out_rounds: u32,
}

impl From<&DiningReport> for PhilosopherTally {
    fn from(report: &DiningReport) -> Self {
        Self {
            seat: report.seat,
            name: report.name.clone(),
            target_meals: report.target_meals,
            meals_eaten: report.meals_eaten,
            timed_out_rounds: report.timed_out_rounds,
        }
    }
}

/// Results from a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Run configuration
    pub config: RunConfig,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// End time
    pub ended_at: DateTime<Utc>,
    /// Tallies in the order philosophers finished
    pub completion_order: Vec<PhilosopherTally>,
    /// Tallies in seating order
    pub tallies: Vec<PhilosopherTally>,
    /// Sum of all meals eaten
    pub total_meals: u32,
    /// Sum of all timed-out acquisition rounds
    pub total_timed_out_rounds: u32,
}

impl SimulationResult {
    /// Build a result record from the collector's reports.
    ///
    /// `reports` must be in completion order, as returned by `Table::run`.
    pub fn from_reports(
        config: RunConfig,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        reports: &[DiningReport],
    ) -> Self {
        let completion_order: Vec<PhilosopherTally> =
            reports.iter().map(PhilosopherTally::from).collect();

        let mut tallies = completion_order.clone();
        tallies.sort_by_key(|t| t.seat);

        let total_meals = tallies.iter().map(|t| t.meals_eaten).sum();
        let total_timed_out_rounds = tallies.iter().map(|t| t.timed_out_rounds).sum();

        Self {
            config,
            started_at,
            ended_at,
            completion_order,
            tallies,
            total_meals,
            total_timed_out_rounds,
        }
    }

    /// Save the result to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let result = serde_json::from_str(&json)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reports() -> Vec<DiningReport> {
        vec![
            DiningReport {
                seat: 2,
                name: "Augustine".to_string(),
                target_meals: 2,
                meals_eaten: 2,
                timed_out_rounds: 1,
            },
            DiningReport {
                seat: 0,
                name: "Plato".to_string(),
                target_meals: 3,
                meals_eaten: 3,
                timed_out_rounds: 0,
            },
            DiningReport {
                seat: 1,
                name: "Aristotle".to_string(),
                target_meals: 4,
                meals_eaten: 4,
                timed_out_rounds: 2,
            },
        ]
    }

    fn sample_config() -> RunConfig {
        RunConfig {
            philosophers: 3,
            max_meals: Some(5),
            hold_timeout_ms: 1000,
            max_think_ms: 1000,
            max_eat_ms: 1000,
            seed: Some(42),
        }
    }

    #[test]
    fn test_orders_and_totals() {
        let result = SimulationResult::from_reports(
            sample_config(),
            Utc::now(),
            Utc::now(),
            &sample_reports(),
        );

        // Completion order preserved, tallies re-sorted by seat.
        let finished: Vec<usize> = result.completion_order.iter().map(|t| t.seat).collect();
        assert_eq!(finished, vec![2, 0, 1]);
        let seated: Vec<usize> = result.tallies.iter().map(|t| t.seat).collect();
        assert_eq!(seated, vec![0, 1, 2]);

        assert_eq!(result.total_meals, 9);
        assert_eq!(result.total_timed_out_rounds, 3);
    }

    #[test]
    fn test_save_and_load() {
        let result = SimulationResult::from_reports(
            sample_config(),
            Utc::now(),
            Utc::now(),
            &sample_reports(),
        );

        let path = std::env::temp_dir().join("dining-results-test.json");
        result.save(&path).unwrap();
        let loaded = SimulationResult::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.tallies, result.tallies);
        assert_eq!(loaded.completion_order, result.completion_order);
        assert_eq!(loaded.total_meals, result.total_meals);
    }
}
