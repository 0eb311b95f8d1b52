//! In-memory sink.

use std::sync::Mutex;

use super::{ResultSink, SinkError};
use crate::worker::VanityResult;

/// Collects matches in memory instead of writing them to disk.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<VanityResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything persisted so far.
    pub fn results(&self) -> Vec<VanityResult> {
        self.results
            .lock()
            .map(|results| results.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.results.lock().map(|results| results.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn persist(&self, result: &VanityResult) -> Result<(), SinkError> {
        // A poisoned lock only means another worker panicked mid-push.
        let mut results = self
            .results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        results.push(result.clone());
        Ok(())
    }
}
