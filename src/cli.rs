//! Command-line interface definitions for Job Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option is optional: a bare invocation checks yesterday (JST) and posts
//! to the webhook named by `SLACK_WEBHOOK_URL`, if any.

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;

/// Command-line arguments for the Job Digest application.
///
/// # Examples
///
/// ```sh
/// # Daily run from a scheduler
/// SLACK_WEBHOOK_URL=https://hooks.slack.com/services/... job_digest
///
/// # Re-check a specific day without posting
/// job_digest --date 2025-09-08 --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Target date (YYYY-MM-DD); defaults to yesterday in the configured zone
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Timeout for fetching listing pages, in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Timeout for posting the digest, in seconds
    #[arg(long, default_value_t = 10)]
    pub post_timeout_secs: u64,

    /// Extra attempts for a listing fetch that fails at the network level
    #[arg(long, default_value_t = 2)]
    pub retries: usize,

    /// UTC offset, in hours, that update times are normalized to
    #[arg(long, default_value_t = 9, allow_negative_numbers = true)]
    pub utc_offset_hours: i32,

    /// Report dRサイト postings updated after this local time ("YYYY-MM-DD HH:MM:SS")
    /// instead of postings updated on the target date
    #[arg(long, value_parser = parse_datetime)]
    pub dr_updated_after: Option<NaiveDateTime>,

    /// Print the digest without posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the collected jobs as JSON instead of the text digest
    #[arg(long)]
    pub json: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM:SS\": {e}"))
}
