//! JobMedley occupational health nurse listings.
//!
//! Results are not in the markup. They are shipped as a `"jmJobOffers":[...]`
//! array inside a script block, which is cut out with
//! [`extract_json_array`](crate::extract::extract_json_array) and decoded with
//! `serde_json`. Timestamps are UTC and converted to the configured zone before
//! the date comparison.

use super::{JobBoard, keep_matching};
use crate::config::Settings;
use crate::error::{ParseError, ScrapeError};
use crate::extract::extract_json_array;
use crate::models::{FilterMode, Job, UNKNOWN_TITLE, Updated};
use crate::utils::absolute_url;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

const LISTING_URL: &str = "https://job-medley.com/phn/feature552/?order=2";
const ORIGIN: &str = "https://job-medley.com";
const OFFERS_KEY: &str = "jmJobOffers";

static SCRIPT: Lazy<Selector> = Lazy::new(|| Selector::parse("script").unwrap());

/// The fields read from one entry of the embedded array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Offer {
    updated_at: Option<String>,
    #[serde(rename = "updated_at")]
    updated_at_snake: Option<String>,
    job_offer_card_title: Option<String>,
    title: Option<String>,
    job_offer_card_link: Option<String>,
    link: Option<String>,
    url: Option<String>,
    facility: Option<Facility>,
    job_offer_card_salary_list: Option<Salary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Facility {
    name: Option<String>,
    address_etc: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Salary {
    List(Vec<String>),
    Text(String),
}

/// First non-empty value among the candidates.
fn first_present(candidates: [Option<String>; 3]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct JobMedley {
    listing_url: String,
    zone: FixedOffset,
}

impl JobMedley {
    pub fn new(settings: &Settings) -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            zone: settings.zone,
        }
    }

    fn parse_offer(&self, raw: Value) -> Result<Job, ParseError> {
        let offer: Offer =
            serde_json::from_value(raw).map_err(|_| ParseError::MissingNode("offer fields"))?;

        let stamp = first_present([offer.updated_at, offer.updated_at_snake, None])
            .ok_or(ParseError::MissingNode("updatedAt"))?;
        let updated = parse_timestamp(&stamp, self.zone)?;

        let title = first_present([offer.job_offer_card_title, offer.title, None])
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let mut job = Job::new(title, Updated::At(updated));
        job.url = first_present([offer.job_offer_card_link, offer.link, offer.url])
            .and_then(|href| absolute_url(ORIGIN, href.trim()));

        if let Some(facility) = offer.facility {
            job.details.insert_opt("施設名", facility.name);
            job.details
                .insert_opt("住所", first_present([facility.address_etc, facility.address, None]));
        }
        let salary = offer.job_offer_card_salary_list.map(|salary| match salary {
            Salary::List(items) => items.iter().map(|s| s.trim()).join(" / "),
            Salary::Text(text) => text,
        });
        job.details.insert_opt("給与", salary);

        Ok(job)
    }
}

impl JobBoard for JobMedley {
    fn name(&self) -> &str {
        "JobMedley（産業保健師）"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn parse_listing(&self, page: &str, target: NaiveDate) -> Result<Vec<Job>, ScrapeError> {
        let offers = embedded_offers(page)?;
        debug!(count = offers.len(), "Decoded embedded job offers");

        let items = offers
            .into_iter()
            .map(|raw| self.parse_offer(raw).map(Some));
        Ok(keep_matching(self.name(), items, FilterMode::ExactDate, target))
    }
}

/// Decode the offers array from the first script that carries one.
fn embedded_offers(page: &str) -> Result<Vec<Value>, ScrapeError> {
    let document = Html::parse_document(page);
    let marker = format!("\"{OFFERS_KEY}\":");

    for script in document.select(&SCRIPT) {
        let text: String = script.text().collect();
        if !text.contains(&marker) {
            continue;
        }
        if let Some(array) = extract_json_array(&text, OFFERS_KEY) {
            return serde_json::from_str(array).map_err(|e| {
                warn!(error = %e, "Embedded job offers are not valid JSON");
                ScrapeError::Json(e)
            });
        }
    }

    Err(ScrapeError::DataAbsent(format!("no script with {marker}")))
}

/// Parse an ISO-8601 timestamp and express it in `zone`.
///
/// A `Z` suffix is read as `+00:00`. Timestamps without an offset are taken
/// as UTC, ignoring any fractional seconds.
fn parse_timestamp(raw: &str, zone: FixedOffset) -> Result<DateTime<FixedOffset>, ParseError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw.replace('Z', "+00:00")) {
        return Ok(dt.with_timezone(&zone));
    }

    let without_fraction = raw.split('.').next().unwrap_or(raw);
    NaiveDateTime::parse_from_str(without_fraction, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc().with_timezone(&zone))
        .map_err(|_| ParseError::BadDate(raw.to_string()))
}
