//! Job board scrapers and the aggregator that runs them.
//!
//! Each board implements [`JobBoard`]: it knows its listing URL and how to turn
//! the listing page into normalized [`Job`]s for a target date. [`fetch`] does the
//! GET and the parse; [`collect_all`] runs every board in order and guarantees
//! that one board's failure costs only that board's results.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Update value |
//! |--------|--------|--------|--------------|
//! | dRサイト | [`ishinotomo`] | HTML list items | date and time, already JST |
//! | マイナビDOCTOR | [`mynavi_doctor`] | HTML cards, title keyword filter | date |
//! | Doctor Agent | [`doctor_agent`] | HTML list items, regex | date |
//! | マイナビ看護師 | [`mynavi_kango`] | HTML cards | date, two formats |
//! | JobMedley | [`job_medley`] | JSON array embedded in a script | UTC timestamp |
//!
//! # Common Patterns
//!
//! - A malformed item is logged at debug level and skipped; the rest of the
//!   listing is still returned
//! - Links given as paths are resolved against the site origin
//! - Only the first results page is read

pub mod doctor_agent;
pub mod ishinotomo;
pub mod job_medley;
pub mod mynavi_doctor;
pub mod mynavi_kango;

use crate::config::Settings;
use crate::error::{ParseError, ScrapeError};
use crate::models::{FilterMode, Job, SourceJobs};
use crate::transport::Transport;
use chrono::NaiveDate;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, instrument, warn};

/// A site that lists job postings.
pub trait JobBoard {
    /// Display name used as the digest section header.
    fn name(&self) -> &str;

    /// The first results page.
    fn listing_url(&self) -> &str;

    /// Extract the jobs on `page` that match `target`.
    ///
    /// Item-level problems never fail the call. An `Err` means the page as a
    /// whole had nothing usable.
    fn parse_listing(&self, page: &str, target: NaiveDate) -> Result<Vec<Job>, ScrapeError>;
}

/// The boards checked on every run, in digest order.
pub fn default_boards(settings: &Settings) -> Vec<Box<dyn JobBoard>> {
    vec![
        Box::new(ishinotomo::Ishinotomo::new(settings)),
        Box::new(mynavi_doctor::MynaviDoctor::new()),
        Box::new(doctor_agent::DoctorAgent::new()),
        Box::new(mynavi_kango::MynaviKango::new()),
        Box::new(job_medley::JobMedley::new(settings)),
    ]
}

/// Fetch one board's listing and parse it.
///
/// # Errors
///
/// Fails when the GET fails after retries, or when the board reports the page
/// as unusable.
#[instrument(level = "info", skip_all, fields(source = board.name(), %target))]
pub async fn fetch<T: Transport>(
    board: &dyn JobBoard,
    transport: &T,
    target: NaiveDate,
) -> Result<Vec<Job>, ScrapeError> {
    let response = transport.get(board.listing_url()).await?;
    if !response.is_success() {
        warn!(status = response.status, url = board.listing_url(), "Listing returned non-success status");
    }

    let jobs = board.parse_listing(&response.body, target)?;
    info!(count = jobs.len(), "Collected matching jobs");
    Ok(jobs)
}

/// Run every board one after another and group the results by source.
///
/// Errors and panics inside a board are logged and reported as an empty list
/// for that board.
#[instrument(level = "info", skip_all, fields(%target, boards = boards.len()))]
pub async fn collect_all<T: Transport>(
    boards: &[Box<dyn JobBoard>],
    transport: &T,
    target: NaiveDate,
) -> Vec<SourceJobs> {
    let mut results = Vec::with_capacity(boards.len());

    for board in boards {
        let outcome = AssertUnwindSafe(fetch(board.as_ref(), transport, target))
            .catch_unwind()
            .await;

        let jobs = match outcome {
            Ok(Ok(jobs)) => jobs,
            Ok(Err(e)) => {
                error!(source = board.name(), error = %e, "Source failed; reporting no jobs");
                Vec::new()
            }
            Err(_) => {
                error!(source = board.name(), "Source panicked; reporting no jobs");
                Vec::new()
            }
        };

        results.push(SourceJobs {
            source: board.name().to_string(),
            jobs,
        });
    }

    results
}

/// Keep the successfully parsed items that pass `filter`, in listing order.
///
/// `Ok(None)` marks an item the board deliberately ignores.
pub(crate) fn keep_matching(
    source: &str,
    items: impl IntoIterator<Item = Result<Option<Job>, ParseError>>,
    filter: FilterMode,
    target: NaiveDate,
) -> Vec<Job> {
    let mut jobs = Vec::new();
    let mut skipped = 0usize;

    for (index, item) in items.into_iter().enumerate() {
        match item {
            Ok(Some(job)) if filter.accepts(&job.updated, target) => jobs.push(job),
            Ok(_) => {}
            Err(e) => {
                skipped += 1;
                debug!(source, index, error = %e, "Skipping malformed item");
            }
        }
    }

    if skipped > 0 {
        info!(source, skipped, "Some listing items could not be parsed");
    }
    jobs
}
