//! Table setup and the completion collector.

use std::sync::Arc;

use futures::future::join_all;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::info;

use crate::chopstick::Chopstick;
use crate::config::TableConfig;
use crate::philosopher::{DiningReport, Philosopher};

/// A ring of philosophers and the chopsticks between them.
///
/// Philosopher `i` owns chopstick `i` and borrows chopstick `(i + 1) % n`
/// from its right neighbor, so every chopstick is contended by exactly two
/// seats and the neighbor relation forms a single cycle.
pub struct Table {
    philosophers: Vec<Philosopher>,
    chopsticks: Vec<Arc<Chopstick>>,
}

impl Table {
    /// Seat philosophers with targets drawn uniformly from `[1, max_meals)`.
    ///
    /// The caller is responsible for `max_meals >= 2` and at least two names;
    /// a ring of one seat would have a philosopher borrowing its own
    /// chopstick.
    pub fn seat(names: Vec<String>, max_meals: u32, config: &TableConfig) -> Self {
        let mut rng = Self::table_rng(config);
        let targets = names
            .iter()
            .map(|_| rng.random_range(1..max_meals))
            .collect();
        Self::build(names, targets, rng, config)
    }

    /// Seat philosophers with explicit per-seat meal targets.
    pub fn with_targets(names: Vec<String>, targets: Vec<u32>, config: &TableConfig) -> Self {
        let rng = Self::table_rng(config);
        Self::build(names, targets, rng, config)
    }

    /// Number of seats around the table.
    pub fn seats(&self) -> usize {
        self.philosophers.len()
    }

    /// The chopstick registry, in seat order.
    pub fn chopsticks(&self) -> &[Arc<Chopstick>] {
        &self.chopsticks
    }

    /// Assigned meal targets, in seat order.
    pub fn targets(&self) -> Vec<u32> {
        self.philosophers.iter().map(|p| p.target_meals()).collect()
    }

    /// Run every philosopher to completion and collect their reports.
    ///
    /// Spawns one task per philosopher, then receives exactly one report per
    /// seat from the completion channel; reports arrive in the order the
    /// philosophers finish. No timeout is applied here: a philosopher that
    /// never wins its acquisition race stalls the whole table.
    pub async fn run(self) -> Vec<DiningReport> {
        let seats = self.philosophers.len();
        info!(seats = seats, "philosophers are seated at the table");

        let (tx, mut rx) = mpsc::channel::<DiningReport>(seats);
        let mut tasks = Vec::with_capacity(seats);
        for philosopher in self.philosophers {
            let tx = tx.clone();
            tasks.push(tokio::spawn(async move {
                let report = philosopher.dine().await;
                // The receiver outlives every sender; a failed send only
                // means the collector was dropped mid-run.
                let _ = tx.send(report).await;
            }));
        }
        drop(tx);

        let mut reports = Vec::with_capacity(seats);
        while let Some(report) = rx.recv().await {
            info!(
                philosopher = %report.name,
                meals = report.meals_eaten,
                "finished dining"
            );
            reports.push(report);
        }

        join_all(tasks).await;
        reports
    }

    fn table_rng(config: &TableConfig) -> ChaCha8Rng {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn build(
        names: Vec<String>,
        targets: Vec<u32>,
        mut rng: ChaCha8Rng,
        config: &TableConfig,
    ) -> Self {
        let seats = names.len();
        debug_assert!(seats >= 2, "a ring needs at least two seats");
        debug_assert_eq!(names.len(), targets.len());

        let chopsticks: Vec<Arc<Chopstick>> =
            (0..seats).map(|seat| Arc::new(Chopstick::new(seat))).collect();

        let philosophers = names
            .into_iter()
            .zip(targets)
            .enumerate()
            .map(|(seat, (name, target))| {
                Philosopher::new(
                    seat,
                    name,
                    Arc::clone(&chopsticks[seat]),
                    Arc::clone(&chopsticks[(seat + 1) % seats]),
                    target,
                    ChaCha8Rng::seed_from_u64(rng.random()),
                    config,
                )
            })
            .collect();

        Self {
            philosophers,
            chopsticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Philosopher {}", i + 1)).collect()
    }

    fn fast_config(seed: u64) -> TableConfig {
        TableConfig {
            hold_timeout_ms: 10,
            max_think_ms: 1,
            max_eat_ms: 1,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_seat_builds_one_chopstick_per_philosopher() {
        let table = Table::seat(names(5), 10, &fast_config(1));
        assert_eq!(table.seats(), 5);
        assert_eq!(table.chopsticks().len(), 5);
        assert!(table.chopsticks().iter().all(|c| c.is_available()));
    }

    #[test]
    fn test_seat_draws_targets_below_max() {
        let table = Table::seat(names(8), 10, &fast_config(2));
        for target in table.targets() {
            assert!((1..10).contains(&target));
        }
    }

    #[test]
    fn test_same_seed_assigns_same_targets() {
        let a = Table::seat(names(5), 20, &fast_config(42));
        let b = Table::seat(names(5), 20, &fast_config(42));
        assert_eq!(a.targets(), b.targets());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_collects_one_report_per_seat() {
        let table = Table::seat(names(5), 4, &fast_config(3));
        let targets = table.targets();

        let mut reports = table.run().await;
        assert_eq!(reports.len(), 5);

        reports.sort_by_key(|r| r.seat);
        for (seat, report) in reports.iter().enumerate() {
            assert_eq!(report.seat, seat);
            assert_eq!(report.meals_eaten, targets[seat]);
            assert_eq!(report.target_meals, targets[seat]);
        }
    }
}
