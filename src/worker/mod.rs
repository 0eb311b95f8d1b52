//! Worker pool for parallel onion address search.
//!
//! This module provides:
//! - Multi-threaded CPU workers
//! - A coordinator that waits for the requested number of matches
//! - Shared attempt counters and periodic progress reports
//! - Cooperative cancellation

mod cpu;
mod pool;
mod stats;

pub use cpu::CpuWorker;
pub use pool::{SearchSummary, VanityResult, WorkerPool, DEFAULT_REPORT_INTERVAL};
pub use stats::{ProgressReport, SearchStats};

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::crypto::KeyError;
use crate::output::SinkError;

/// Errors that abort a search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid search parameters: {0}")]
    InvalidArgument(&'static str),
    #[error("key generation failed: {0}")]
    Key(#[from] KeyError),
    #[error("failed to persist match: {0}")]
    Sink(#[from] SinkError),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
    #[error("search cancelled")]
    Cancelled,
}

/// Signals sent from workers to the coordinator.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A match was persisted by the sink
    Matched { worker_id: usize },
    /// The worker hit a fatal error and stopped
    Failed { worker_id: usize, error: SearchError },
}

/// Shared flag checked by every worker once per iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every worker holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
