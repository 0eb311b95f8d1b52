//! Pattern matching for onion identifiers.
//!
//! Patterns are regular expressions evaluated with search semantics
//! against the bare identifier (without `.onion`).

mod pattern;

pub use pattern::{MatchResult, Pattern, PatternError};
