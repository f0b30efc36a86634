//! マイナビ看護師 listings for occupational health nurses.
//!
//! The update date appears as either `2025年09月08日` or `2025-09-08` after an
//! `更新日` label; both are accepted.

use super::{JobBoard, keep_matching};
use crate::error::{ParseError, ScrapeError};
use crate::models::{FilterMode, Job, Reference, UNKNOWN_TITLE, Updated};
use crate::utils::{absolute_url, select_href, select_text};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const LISTING_URL: &str = "https://kango.mynavi.jp/r/wk_0401/";
const ORIGIN: &str = "https://kango.mynavi.jp";

/// Employer name used when the card does not show one.
pub const UNKNOWN_CORP: &str = "企業名不明";

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.job-card").unwrap());
static CORP: Lazy<Selector> = Lazy::new(|| Selector::parse("p.corporate-name").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2.job-name").unwrap());
static UPDATED: Lazy<Selector> = Lazy::new(|| Selector::parse("li.update_time").unwrap());
static JOB_NUMBER: Lazy<Selector> = Lazy::new(|| Selector::parse("li.job_number").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.link-area").unwrap());

#[derive(Debug, Clone)]
pub struct MynaviKango {
    listing_url: String,
}

impl MynaviKango {
    pub fn new() -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
        }
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<Job, ParseError> {
        let raw_date = select_text(card, &UPDATED).ok_or(ParseError::MissingNode("update date"))?;
        let updated = parse_update_date(&raw_date)?;

        let title = select_text(card, &TITLE).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let mut job = Job::new(title, Updated::Day(updated));
        job.corp = Some(select_text(card, &CORP).unwrap_or_else(|| UNKNOWN_CORP.to_string()));
        job.reference = select_text(card, &JOB_NUMBER)
            .map(|text| strip_label(&text, "求人番号").to_string())
            .filter(|value| !value.is_empty())
            .map(|value| Reference {
                label: "求人番号",
                value,
            });
        job.url = select_href(card, &LINK).and_then(|href| absolute_url(ORIGIN, href));
        Ok(job)
    }
}

impl Default for MynaviKango {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard for MynaviKango {
    fn name(&self) -> &str {
        "マイナビ看護師"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn parse_listing(&self, page: &str, target: NaiveDate) -> Result<Vec<Job>, ScrapeError> {
        let document = Html::parse_document(page);
        let cards = document
            .select(&CARD)
            .map(|card| self.parse_card(card).map(Some));
        Ok(keep_matching(self.name(), cards, FilterMode::ExactDate, target))
    }
}

/// Remove a leading `label:` / `label：` prefix and surrounding whitespace.
fn strip_label<'a>(text: &'a str, label: &str) -> &'a str {
    let text = text.trim();
    text.strip_prefix(label)
        .map(|rest| rest.trim_start_matches([':', '：']))
        .unwrap_or(text)
        .trim()
}

fn parse_update_date(text: &str) -> Result<NaiveDate, ParseError> {
    let value = strip_label(text, "更新日");
    NaiveDate::parse_from_str(value, "%Y年%m月%d日")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| ParseError::BadDate(text.to_string()))
}
