//! CPU-based worker for onion address search.

use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, error, info};

use crate::crypto::Keypair;
use crate::matcher::{MatchResult, Pattern};
use crate::output::ResultSink;

use super::{CancelToken, SearchError, SearchStats, VanityResult, WorkerEvent};

/// A CPU worker that generates and tests keypairs.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// The pattern to match against
    pattern: Arc<Pattern>,
    /// Where matches are stored
    sink: Arc<dyn ResultSink>,
    /// Channel to the coordinator
    events: Sender<WorkerEvent>,
    /// Shared cancellation flag
    cancel: CancelToken,
    /// Shared counters
    stats: Arc<SearchStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        pattern: Arc<Pattern>,
        sink: Arc<dyn ResultSink>,
        events: Sender<WorkerEvent>,
        cancel: CancelToken,
        stats: Arc<SearchStats>,
    ) -> Self {
        Self {
            id,
            pattern,
            sink,
            events,
            cancel,
            stats,
        }
    }

    /// Runs one generate-and-test iteration.
    ///
    /// On a match the key is persisted and the coordinator is signalled.
    /// The attempt counter is bumped either way.
    pub fn step(&self) -> Result<MatchResult, SearchError> {
        let keypair = Keypair::generate()?;
        let result = self.pattern.matches(keypair.address().as_str());

        if result.is_match() {
            let found = VanityResult::from_keypair(&keypair, self.id);
            info!(worker = self.id, address = %found.address, "match found");

            self.sink.persist(&found)?;
            self.stats.record_match();
            // The coordinator may already be gone after reaching its target
            let _ = self.events.send(WorkerEvent::Matched { worker_id: self.id });
        }

        self.stats.record_attempt();
        Ok(result)
    }

    /// Runs the worker loop until cancelled or a fatal error occurs.
    ///
    /// Fatal errors are forwarded to the coordinator, which aborts the
    /// whole search.
    pub fn run(&self) {
        debug!(worker = self.id, "worker started");

        while !self.cancel.is_cancelled() {
            if let Err(err) = self.step() {
                error!(worker = self.id, error = %err, "worker stopped on fatal error");
                let _ = self.events.send(WorkerEvent::Failed {
                    worker_id: self.id,
                    error: err,
                });
                return;
            }
        }

        debug!(worker = self.id, "worker stopped");
    }
}
