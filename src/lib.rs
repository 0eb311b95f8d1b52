//! # onion_vanity
//!
//! Multi-threaded Tor v3 onion vanity address generator.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation, address derivation and secret expansion
//! - `matcher`: Regex matching against onion identifiers
//! - `worker`: Parallel search, shared counters and the worker pool
//! - `output`: Result sinks (hidden service directories)
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod output;
pub mod worker;

pub use config::Config;
pub use crypto::{expand_secret, ExpandedSecret, Keypair, OnionAddress};
pub use matcher::{MatchResult, Pattern};
pub use output::{HiddenServiceDir, MemorySink, ResultSink};
pub use worker::{
    CancelToken, ProgressReport, SearchError, SearchSummary, VanityResult, WorkerPool,
};
