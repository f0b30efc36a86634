//! # Job Digest
//!
//! Checks several job boards for postings whose "last updated" date is a given
//! day (yesterday in JST by default), normalizes them into one record shape, and
//! sends a plain-text digest to a Slack incoming webhook.
//!
//! ## Usage
//!
//! ```sh
//! SLACK_WEBHOOK_URL=https://hooks.slack.com/services/... job_digest
//! job_digest --date 2025-09-08 --dry-run
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: each board's first results page is downloaded, one board at a time
//! 2. **Normalizing**: site-specific markup or embedded JSON becomes [`models::Job`]s
//! 3. **Filtering**: only jobs updated on the target date are kept
//! 4. **Output**: the digest is printed and posted once to the webhook
//!
//! A failing board contributes an empty section; it never stops the run.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod models;
mod outputs;
mod scrapers;
#[cfg(test)]
mod testutil;
mod transport;
mod utils;

use cli::Cli;
use config::Settings;
use outputs::{digest, slack};
use transport::{ReqwestTransport, RetryTransport};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("job_digest starting up");

    let args = Cli::parse();
    debug!(?args.date, args.dry_run, args.json, "Parsed CLI arguments");

    let settings = Settings::from_cli(&args).map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    let target = args.date.unwrap_or_else(|| settings.yesterday());
    info!(%target, zone = %settings.zone, "Checking for postings updated on target date");

    let transport = RetryTransport::new(
        ReqwestTransport::new(&settings)?,
        settings.retries,
        settings.retry_base_delay,
    );

    // ---- Fetch, normalize and filter every board ----
    let boards = scrapers::default_boards(&settings);
    let results = scrapers::collect_all(&boards, &transport, target).await;

    let total: usize = results.iter().map(|r| r.jobs.len()).sum();
    for r in &results {
        info!(source = %r.source, count = r.jobs.len(), "Source results");
    }
    info!(total, sources = results.len(), "Collection complete");

    // ---- Output ----
    let text = digest::render_digest(&results);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{text}");
    }

    if args.dry_run {
        info!("Dry run; not posting the digest");
    } else {
        let outcome = slack::notify(&transport, settings.webhook_url.as_deref(), &text).await;
        debug!(?outcome, "Notification finished");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
