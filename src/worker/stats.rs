//! Shared search counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared by every worker of a search.
///
/// The attempt counter only ever grows; workers bump it once per
/// generated keypair whether or not it matched.
#[derive(Debug)]
pub struct SearchStats {
    /// Total keypairs generated and tested
    attempts: AtomicU64,
    /// Matches handed to the sink
    matches: AtomicU64,
    /// When the counters were created
    created: Instant,
    /// Offset of the search start from `created`, in nanoseconds
    started_at: AtomicU64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            created: Instant::now(),
            started_at: AtomicU64::new(0),
        }
    }

    /// Marks the start of the search; `elapsed` is measured from here.
    pub fn mark_started(&self) {
        let offset = self.created.elapsed().as_nanos() as u64;
        self.started_at.store(offset, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the total attempts across all workers.
    pub fn total_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns the total matches, including any found after the target.
    pub fn total_matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }

    /// Returns the time since the search started (or since creation if
    /// it has not been marked as started).
    pub fn elapsed(&self) -> Duration {
        let started_at = Duration::from_nanos(self.started_at.load(Ordering::Relaxed));
        self.created.elapsed().saturating_sub(started_at)
    }

    /// Takes a throughput sample.
    pub fn report(&self) -> ProgressReport {
        let elapsed = self.elapsed();
        let attempts = self.total_attempts();
        ProgressReport {
            elapsed,
            attempts,
            rate: rate(attempts, elapsed),
        }
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn rate(attempts: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        attempts as f64 / secs
    } else {
        0.0
    }
}

/// One throughput sample, emitted every report interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub elapsed: Duration,
    pub attempts: u64,
    /// Attempts per second since the search started
    pub rate: f64,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:08}]: Computed {} Keys (Rate: {:.6} per Second)",
            self.elapsed.as_secs(),
            self.attempts,
            self.rate
        )
    }
}
