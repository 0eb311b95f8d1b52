//! Result sinks for discovered keys.
//!
//! Workers hand every match to a [`ResultSink`]; the sink owns the storage
//! format. Any error it returns aborts the search.

mod hidden_service;
mod memory;

pub use hidden_service::{
    secret_key_file, public_key_file, HiddenServiceDir, HOSTNAME_FILE, PUBLIC_KEY_FILE,
    PUBLIC_KEY_HEADER, SECRET_KEY_FILE, SECRET_KEY_HEADER,
};
pub use memory::MemorySink;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::worker::VanityResult;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Receives every match found by the workers.
pub trait ResultSink: Send + Sync {
    /// Stores one discovered key.
    fn persist(&self, result: &VanityResult) -> Result<(), SinkError>;
}
