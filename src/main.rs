//! Tor v3 Onion Vanity Address Generator CLI
//!
//! Usage:
//!   onion-vanity '^tor'              # Find one address starting with "tor"
//!   onion-vanity 'cafe' 5            # Find 5 addresses containing "cafe"
//!   onion-vanity '^ab' --num-cpu 4   # Limit the search to 4 threads

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use onion_vanity::worker::SearchError;
use onion_vanity::{CancelToken, Config, HiddenServiceDir, WorkerPool};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::parse();
    config.validate().context("configuration error")?;
    let pattern = config.compile_pattern()?;

    info!(
        pattern = pattern.as_str(),
        difficulty = %pattern.difficulty_description(),
        workers = config.worker_count(),
        required_matches = config.match_count,
        output = %config.output.display(),
        "onion vanity search"
    );

    let sink = Arc::new(HiddenServiceDir::new(&config.output));
    let pool = WorkerPool::new(config.worker_count(), pattern, sink)
        .with_report_interval(config.report_interval());

    ctrlc_handler(pool.cancel_token())?;
    info!("searching... (press Ctrl+C to stop)");

    let summary = match pool.run(config.match_count, |report| info!("{}", report)) {
        Ok(summary) => summary,
        Err(SearchError::Cancelled) => {
            info!(keys = pool.total_keys(), "stopped by user");
            return Ok(());
        }
        Err(err) => return Err(err).context("search failed"),
    };

    info!(
        keys = summary.attempts,
        matches = summary.matches,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        keys_per_second = summary.keys_per_second(),
        "target reached"
    );

    Ok(())
}

fn ctrlc_handler(cancel: CancelToken) -> Result<()> {
    ctrlc::set_handler(move || cancel.cancel()).context("error setting Ctrl-C handler")
}
