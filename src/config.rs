//! Runtime settings passed to the transport and the scrapers.
//!
//! [`Settings`] replaces process-wide constants: tests build their own value
//! (shorter timeouts, a different zone) without touching global state.

use crate::cli::Cli;
use crate::models::FilterMode;
use chrono::{Days, FixedOffset, NaiveDate, Utc};
use std::time::Duration;

/// Browser-like User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Japan Standard Time, UTC+9.
pub const JST_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Zone every update time is normalized to.
    pub zone: FixedOffset,
    pub user_agent: String,
    pub get_timeout: Duration,
    pub post_timeout: Duration,
    /// Extra GET attempts after a network-level failure.
    pub retries: usize,
    /// First backoff delay between GET attempts; doubles per attempt.
    pub retry_base_delay: Duration,
    pub webhook_url: Option<String>,
    /// Filter applied to the dRサイト listing.
    pub dr_filter: FilterMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zone: jst(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            get_timeout: Duration::from_secs(15),
            post_timeout: Duration::from_secs(10),
            retries: 2,
            retry_base_delay: Duration::from_millis(500),
            webhook_url: None,
            dr_filter: FilterMode::ExactDate,
        }
    }
}

impl Settings {
    /// Build settings from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the UTC offset is out of range (±23 hours).
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        let zone = cli
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| format!("invalid UTC offset: {} hours", cli.utc_offset_hours))?;

        Ok(Self {
            zone,
            get_timeout: Duration::from_secs(cli.timeout_secs),
            post_timeout: Duration::from_secs(cli.post_timeout_secs),
            retries: cli.retries,
            webhook_url: cli.webhook_url.clone().filter(|u| !u.trim().is_empty()),
            dr_filter: cli
                .dr_updated_after
                .map(FilterMode::UpdatedAfter)
                .unwrap_or_default(),
            ..Self::default()
        })
    }

    /// The day before today, on the wall clock of the configured zone.
    pub fn yesterday(&self) -> NaiveDate {
        let today = Utc::now().with_timezone(&self.zone).date_naive();
        today.checked_sub_days(Days::new(1)).unwrap_or(today)
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap()
}
