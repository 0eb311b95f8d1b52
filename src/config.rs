//! Runtime configuration for the onion vanity generator.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::matcher::{Pattern, PatternError};

/// Tor v3 Onion Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Regex to look for in the onion identifier (without ".onion")
    pub pattern: String,

    /// Number of matches to find before stopping
    #[arg(default_value = "1")]
    pub match_count: u64,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long = "num-cpu")]
    pub workers: Option<usize>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "10")]
    pub report_interval: u64,

    /// Directory the hidden service folders are written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_count == 0 {
            return Err(ConfigError::InvalidValue(
                "Match count must be at least 1".into(),
            ));
        }

        if self.workers == Some(0) {
            return Err(ConfigError::InvalidValue(
                "Worker count must be at least 1".into(),
            ));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidValue(
                "Report interval must be at least 1 second".into(),
            ));
        }

        self.compile_pattern()?;
        Ok(())
    }

    /// Compiles the search pattern
    pub fn compile_pattern(&self) -> Result<Pattern, ConfigError> {
        Ok(Pattern::new(&self.pattern)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(pattern: &str) -> Config {
        Config {
            pattern: pattern.into(),
            match_count: 1,
            workers: None,
            report_interval: 10,
            output: PathBuf::from("."),
        }
    }

    #[test]
    fn test_valid_pattern() {
        let config = make_test_config("^tor");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        let config = make_test_config("(tor");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = make_test_config("tor");
        config.match_count = 0;
        assert!(config.validate().is_err());

        let mut config = make_test_config("tor");
        config.workers = Some(0);
        assert!(config.validate().is_err());

        let mut config = make_test_config("tor");
        config.report_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let config = Config::try_parse_from(["onion-vanity", "^abc"]).unwrap();
        assert_eq!(config.pattern, "^abc");
        assert_eq!(config.match_count, 1);
        assert_eq!(config.workers, None);
        assert_eq!(config.worker_count(), num_cpus::get());
        assert_eq!(config.report_interval(), Duration::from_secs(10));
        assert_eq!(config.output, PathBuf::from("."));
    }

    #[test]
    fn test_cli_positional_count_and_flags() {
        let config = Config::try_parse_from([
            "onion-vanity",
            "tor",
            "3",
            "--num-cpu",
            "2",
            "--output",
            "/tmp/keys",
        ])
        .unwrap();
        assert_eq!(config.match_count, 3);
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.output, PathBuf::from("/tmp/keys"));
    }
}
