//! Pattern matching implementation.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

impl From<bool> for MatchResult {
    #[inline]
    fn from(matched: bool) -> Self {
        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }
}

/// A compiled regular expression tested against bare onion identifiers.
///
/// Matching is unanchored: the pattern may match anywhere unless it
/// anchors itself with `^` or `$`. The compiled regex is immutable and
/// `Sync`, so one instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles a new pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Returns the pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Matches an identifier against this pattern.
    #[inline]
    pub fn matches(&self, identifier: &str) -> MatchResult {
        self.regex.is_match(identifier).into()
    }

    /// Estimated attempts per match for a `^`-anchored literal prefix.
    ///
    /// Each base32 character has 32 possible values, so a literal prefix
    /// of length n needs about 32^n attempts. Returns `None` for anything
    /// more complex than `^[a-z2-7]+`.
    pub fn estimated_difficulty(&self) -> Option<u64> {
        let literal = self.regex.as_str().strip_prefix('^')?;
        if literal.is_empty()
            || !literal
                .bytes()
                .all(|b| b.is_ascii_lowercase() || (b'2'..=b'7').contains(&b))
        {
            return None;
        }
        Some(32u64.saturating_pow(literal.len() as u32))
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        match self.estimated_difficulty() {
            None => "Unknown (complex pattern)".into(),
            Some(0..=1_000) => "Very Easy (< 1 second)".into(),
            Some(1_001..=100_000) => "Easy (seconds)".into(),
            Some(100_001..=100_000_000) => "Medium (minutes)".into(),
            Some(100_000_001..=100_000_000_000) => "Hard (hours)".into(),
            Some(_) => "Very Hard (days or more)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "hnvcppgow2sc2yvdvdicu3ynonsteflxdxrehjr2ybekdc2z3iu63yid";

    #[test]
    fn test_unanchored_match() {
        let pattern = Pattern::new("sc2yv").unwrap();
        assert!(pattern.matches(ADDR).is_match());
    }

    #[test]
    fn test_anchored_prefix() {
        assert!(Pattern::new("^hnvc").unwrap().matches(ADDR).is_match());
        assert!(!Pattern::new("^sc2y").unwrap().matches(ADDR).is_match());
    }

    #[test]
    fn test_anchored_suffix() {
        assert!(Pattern::new("63yid$").unwrap().matches(ADDR).is_match());
        // The `.onion` suffix is not part of the identifier
        assert!(!Pattern::new("onion$").unwrap().matches(ADDR).is_match());
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let pattern = Pattern::new("").unwrap();
        assert!(pattern.matches(ADDR).is_match());
        assert!(pattern.matches("").is_match());
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            Pattern::new("(unclosed"),
            Err(PatternError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_difficulty() {
        let pattern = Pattern::new("^abc").unwrap();
        assert_eq!(pattern.estimated_difficulty(), Some(32768)); // 32^3
        assert_eq!(Pattern::new("abc").unwrap().estimated_difficulty(), None);
        assert_eq!(Pattern::new("^a.c").unwrap().estimated_difficulty(), None);
    }

    #[test]
    fn test_shared_across_threads() {
        let pattern = std::sync::Arc::new(Pattern::new("^hn").unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pattern = pattern.clone();
                std::thread::spawn(move || pattern.matches(ADDR).is_match())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
