//! Worker pool management.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use tracing::{info, warn};

use crate::crypto::{ExpandedSecret, Keypair, OnionAddress};
use crate::matcher::Pattern;
use crate::output::ResultSink;

use super::cpu::CpuWorker;
use super::stats::{rate, ProgressReport, SearchStats};
use super::{CancelToken, SearchError, WorkerEvent};

/// Default interval between progress reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// A discovered key, as handed to the result sink.
#[derive(Debug, Clone)]
pub struct VanityResult {
    /// The matching onion identifier
    pub address: OnionAddress,
    /// The raw ed25519 public key
    pub public_key: [u8; 32],
    /// The expanded secret key
    pub expanded_secret: ExpandedSecret,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

impl VanityResult {
    pub fn from_keypair(keypair: &Keypair, worker_id: usize) -> Self {
        Self {
            address: keypair.address().clone(),
            public_key: *keypair.public_key(),
            expanded_secret: keypair.expanded_secret(),
            worker_id,
        }
    }
}

/// Final statistics of a completed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSummary {
    /// Keypairs generated across all workers
    pub attempts: u64,
    /// Matches persisted, which may exceed the requested count
    pub matches: u64,
    pub elapsed: Duration,
}

impl SearchSummary {
    pub fn keys_per_second(&self) -> f64 {
        rate(self.attempts, self.elapsed)
    }
}

/// Runs a pool of workers until enough matches have been found.
///
/// A pool searches once: after `run` returns its workers are stopped.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// The pattern to search for
    pattern: Arc<Pattern>,
    /// Where matches are stored
    sink: Arc<dyn ResultSink>,
    /// Progress report cadence
    report_interval: Duration,
    /// Shared cancellation flag
    cancel: CancelToken,
    /// Shared statistics
    stats: Arc<SearchStats>,
}

impl WorkerPool {
    /// Creates a new worker pool with the specified number of workers.
    pub fn new(num_workers: usize, pattern: Pattern, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            num_workers,
            pattern: Arc::new(pattern),
            sink,
            report_interval: DEFAULT_REPORT_INTERVAL,
            cancel: CancelToken::new(),
            stats: Arc::new(SearchStats::new()),
        }
    }

    /// Sets how often `run` reports progress.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Searches until `required_matches` matches have been persisted.
    ///
    /// Blocks the calling thread. `on_progress` is called with a throughput
    /// sample every report interval. Workers still running when the target
    /// is reached may persist a few extra matches before they observe the
    /// stop flag; those are counted in [`SearchSummary::matches`].
    pub fn run<F>(
        &self,
        required_matches: u64,
        mut on_progress: F,
    ) -> Result<SearchSummary, SearchError>
    where
        F: FnMut(&ProgressReport),
    {
        if self.num_workers == 0 {
            return Err(SearchError::InvalidArgument("worker count must be positive"));
        }
        if required_matches == 0 {
            return Err(SearchError::InvalidArgument("match count must be positive"));
        }
        if self.report_interval.is_zero() {
            return Err(SearchError::InvalidArgument("report interval must be positive"));
        }

        info!(
            workers = self.num_workers,
            required_matches,
            pattern = self.pattern.as_str(),
            "search started"
        );

        self.stats.mark_started();
        let (event_tx, event_rx) = unbounded();
        let handles = self.spawn_workers(event_tx)?;

        let outcome = self.wait_for_matches(required_matches, &event_rx, &mut on_progress);
        let cancelled_externally = self.is_stopped();

        self.stop();
        let joined = join_workers(handles);

        match (outcome, joined) {
            // A panicked worker explains an unexpected disconnect better
            (Err(SearchError::Cancelled), Err(panicked)) if !cancelled_externally => {
                Err(panicked)
            }
            (Err(err), _) | (Ok(()), Err(err)) => {
                warn!(error = %err, "search aborted");
                Err(err)
            }
            (Ok(()), Ok(())) => {
                let summary = SearchSummary {
                    attempts: self.stats.total_attempts(),
                    matches: self.stats.total_matches(),
                    elapsed: self.stats.elapsed(),
                };
                info!(
                    attempts = summary.attempts,
                    matches = summary.matches,
                    "search complete"
                );
                Ok(summary)
            }
        }
    }

    /// Spawns worker threads. On failure the already started workers are
    /// stopped and joined.
    fn spawn_workers(
        &self,
        event_tx: Sender<WorkerEvent>,
    ) -> Result<Vec<(usize, JoinHandle<()>)>, SearchError> {
        let mut handles = Vec::with_capacity(self.num_workers);

        for id in 0..self.num_workers {
            let worker = CpuWorker::new(
                id,
                self.pattern.clone(),
                self.sink.clone(),
                event_tx.clone(),
                self.cancel.clone(),
                self.stats.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("onion-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(err) => {
                    self.stop();
                    let _ = join_workers(handles);
                    return Err(SearchError::Spawn(err));
                }
            }
        }

        Ok(handles)
    }

    /// The completion gate: counts match signals down to zero while the
    /// ticker drives progress reports.
    fn wait_for_matches<F>(
        &self,
        required_matches: u64,
        events: &Receiver<WorkerEvent>,
        on_progress: &mut F,
    ) -> Result<(), SearchError>
    where
        F: FnMut(&ProgressReport),
    {
        let ticker = tick(self.report_interval);
        let mut remaining = required_matches;

        while remaining > 0 {
            select! {
                recv(events) -> event => match event {
                    Ok(WorkerEvent::Matched { .. }) => remaining -= 1,
                    Ok(WorkerEvent::Failed { worker_id, error }) => {
                        warn!(worker = worker_id, "worker failed, stopping search");
                        return Err(error);
                    }
                    // Every worker has exited
                    Err(_) => return Err(SearchError::Cancelled),
                },
                recv(ticker) -> _ => on_progress(&self.stats.report()),
            }
        }

        Ok(())
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns a clone of the cancel token for external use (e.g., signal handlers).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the shared statistics.
    pub fn stats(&self) -> Arc<SearchStats> {
        self.stats.clone()
    }

    /// Returns the total keys generated across all workers.
    pub fn total_keys(&self) -> u64 {
        self.stats.total_attempts()
    }
}

fn join_workers(handles: Vec<(usize, JoinHandle<()>)>) -> Result<(), SearchError> {
    let mut result = Ok(());
    for (id, handle) in handles {
        if handle.join().is_err() && result.is_ok() {
            result = Err(SearchError::WorkerPanicked(id));
        }
    }
    result
}
