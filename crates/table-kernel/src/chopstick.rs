//! Single-slot exclusive locks for the shared chopsticks.

use tokio::sync::Semaphore;
use tokio::time::{timeout, Duration};

/// A chopstick shared by two neighboring philosophers.
///
/// Backed by a binary semaphore: exactly one permit exists, so at most one
/// philosopher holds the chopstick at any instant. The permit is forgotten on
/// acquisition rather than held as a guard, because the holder releases its
/// chopsticks at a different point in the dining loop than where it picked
/// them up.
#[derive(Debug)]
pub struct Chopstick {
    seat: usize,
    slot: Semaphore,
}

impl Chopstick {
    /// Create an available chopstick for the given seat.
    pub fn new(seat: usize) -> Self {
        Self {
            seat,
            slot: Semaphore::new(1),
        }
    }

    /// Seat index this chopstick belongs to.
    pub fn seat(&self) -> usize {
        self.seat
    }

    /// Wait until the chopstick is free, then take it.
    pub async fn acquire(&self) {
        self.slot
            .acquire()
            .await
            .expect("chopstick semaphore is never closed")
            .forget();
    }

    /// Try to take the chopstick, giving up after `wait`.
    ///
    /// Races the acquisition against a timer; whichever completes first wins.
    /// Returns `true` if the chopstick was obtained. A lost race leaves no
    /// residual claim on the chopstick.
    pub async fn acquire_timeout(&self, wait: Duration) -> bool {
        match timeout(wait, self.slot.acquire()).await {
            Ok(permit) => {
                permit
                    .expect("chopstick semaphore is never closed")
                    .forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Put the chopstick back.
    ///
    /// Must only be called by the current holder; releasing an available
    /// chopstick is a protocol violation.
    pub fn release(&self) {
        debug_assert_eq!(
            self.slot.available_permits(),
            0,
            "chopstick {} released while already available",
            self.seat
        );
        self.slot.add_permits(1);
    }

    /// Whether the chopstick is currently on the table.
    pub fn is_available(&self) -> bool {
        self.slot.available_permits() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let stick = Chopstick::new(0);
        assert!(stick.is_available());

        stick.acquire().await;
        assert!(!stick.is_available());

        stick.release();
        assert!(stick.is_available());
    }

    #[tokio::test]
    async fn test_acquire_timeout_fails_while_held() {
        let stick = Chopstick::new(0);
        stick.acquire().await;

        let got = stick.acquire_timeout(Duration::from_millis(10)).await;
        assert!(!got);
        assert!(!stick.is_available());
    }

    #[tokio::test]
    async fn test_lost_race_leaves_no_residual_claim() {
        let stick = Chopstick::new(0);
        stick.acquire().await;

        assert!(!stick.acquire_timeout(Duration::from_millis(5)).await);

        // After the holder lets go, the next taker gets exactly one claim.
        stick.release();
        assert!(stick.acquire_timeout(Duration::from_millis(5)).await);
        assert!(!stick.is_available());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mutual_exclusion_under_contention() {
        let stick = Arc::new(Chopstick::new(0));
        let holders = Arc::new(AtomicUsize::new(0));
        let violated = Arc::new(AtomicBool::new(false));

        let mut tasks = Vec::new();
        for _ in 0..2 {
            let stick = Arc::clone(&stick);
            let holders = Arc::clone(&holders);
            let violated = Arc::clone(&violated);
            tasks.push(tokio::spawn(async move {
                for _ in 0..200 {
                    stick.acquire().await;
                    if holders.fetch_add(1, Ordering::SeqCst) != 0 {
                        violated.store(true, Ordering::SeqCst);
                    }
                    tokio::task::yield_now().await;
                    holders.fetch_sub(1, Ordering::SeqCst);
                    stick.release();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert!(!violated.load(Ordering::SeqCst));
        assert!(stick.is_available());
    }
}
