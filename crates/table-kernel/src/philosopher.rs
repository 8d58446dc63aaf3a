//! Philosophers: the dining loop and the chopstick acquisition protocol.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::chopstick::Chopstick;
use crate::config::TableConfig;

/// Final tally a philosopher sends to the table when it finishes dining.
#[derive(Debug, Clone)]
pub struct DiningReport {
    /// Seat index around the table.
    pub seat: usize,
    /// Philosopher name.
    pub name: String,
    /// Meals this philosopher was assigned.
    pub target_meals: u32,
    /// Meals actually eaten (equals the target on completion).
    pub meals_eaten: u32,
    /// Acquisition rounds that timed out waiting for the neighbor's
    /// chopstick. High values indicate starvation pressure.
    pub timed_out_rounds: u32,
}

/// One concurrent participant in the simulation.
///
/// A philosopher owns the chopstick at its own seat and must also pick up the
/// right neighbor's chopstick to eat. The neighbor relation is wired up as
/// shared handles into the table's chopstick registry; philosophers never
/// reference each other.
pub struct Philosopher {
    seat: usize,
    name: String,
    own: Arc<Chopstick>,
    neighbor: Arc<Chopstick>,
    target_meals: u32,
    meals_eaten: u32,
    timed_out_rounds: u32,
    rng: ChaCha8Rng,
    hold_timeout: Duration,
    max_think: Duration,
    max_eat: Duration,
}

impl Philosopher {
    /// Seat a philosopher with its two chopstick handles and a private RNG.
    pub fn new(
        seat: usize,
        name: impl Into<String>,
        own: Arc<Chopstick>,
        neighbor: Arc<Chopstick>,
        target_meals: u32,
        rng: ChaCha8Rng,
        config: &TableConfig,
    ) -> Self {
        Self {
            seat,
            name: name.into(),
            own,
            neighbor,
            target_meals,
            meals_eaten: 0,
            timed_out_rounds: 0,
            rng,
            hold_timeout: config.hold_timeout(),
            max_think: config.max_think(),
            max_eat: config.max_eat(),
        }
    }

    /// Seat index around the table.
    pub fn seat(&self) -> usize {
        self.seat
    }

    /// Philosopher name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Meals this philosopher is assigned to eat.
    pub fn target_meals(&self) -> u32 {
        self.target_meals
    }

    /// Run the dining loop to completion: think, pick up both chopsticks,
    /// eat, put them back, until the target meal count is reached.
    pub async fn dine(mut self) -> DiningReport {
        while self.meals_eaten < self.target_meals {
            self.think().await;
            self.acquire_chopsticks().await;
            self.eat().await;
            self.own.release();
            self.neighbor.release();
        }

        info!(
            philosopher = %self.name,
            meals = self.meals_eaten,
            timed_out_rounds = self.timed_out_rounds,
            "done dining"
        );

        DiningReport {
            seat: self.seat,
            name: self.name,
            target_meals: self.target_meals,
            meals_eaten: self.meals_eaten,
            timed_out_rounds: self.timed_out_rounds,
        }
    }

    /// Pick up both chopsticks, backing off and retrying on timeout.
    ///
    /// Grabs the own chopstick first (unbounded wait; the only contender is
    /// the left neighbor), then races the neighbor's chopstick against the
    /// hold timeout. Losing the race puts the own chopstick back, pauses for
    /// a fresh random think interval, and restarts the whole round, so no
    /// chopstick is ever held while waiting indefinitely and a circular wait
    /// always has a bounded-time escape.
    async fn acquire_chopsticks(&mut self) {
        loop {
            self.own.acquire().await;
            debug!(philosopher = %self.name, "picked up own chopstick");

            if self.neighbor.acquire_timeout(self.hold_timeout).await {
                debug!(
                    philosopher = %self.name,
                    neighbor_seat = self.neighbor.seat(),
                    "picked up neighbor's chopstick"
                );
                return;
            }

            self.own.release();
            self.timed_out_rounds += 1;
            debug!(
                philosopher = %self.name,
                neighbor_seat = self.neighbor.seat(),
                "timed out waiting for neighbor's chopstick, backing off"
            );
            self.think().await;
        }
    }

    async fn think(&mut self) {
        debug!(philosopher = %self.name, "thinking");
        self.pause(self.max_think).await;
    }

    async fn eat(&mut self) {
        self.meals_eaten += 1;
        debug!(philosopher = %self.name, meal = self.meals_eaten, "eating");
        self.pause(self.max_eat).await;
    }

    /// Sleep for a duration drawn uniformly from `[0, max)`.
    async fn pause(&mut self, max: Duration) {
        let bound = max.as_millis() as u64;
        if bound == 0 {
            return;
        }
        let ms = self.rng.random_range(0..bound);
        sleep(Duration::from_millis(ms)).await;
    }
}
