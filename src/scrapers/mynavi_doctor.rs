//! マイナビDOCTOR part-time listings, restricted to occupational physician posts.
//!
//! Cards are `article.job-card`. The `div.job-number` block mixes the update
//! date and the posting number, e.g. `求人更新日：2025/09/08　求人No.：123456`.

use super::{JobBoard, keep_matching};
use crate::error::{ParseError, ScrapeError};
use crate::models::{FilterMode, Job, Reference, UNKNOWN_TITLE, Updated};
use crate::utils::{absolute_url, element_text, element_words, normalize_spaces, select_href, select_text};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const LISTING_URL: &str = "https://doctor.mynavi.jp/search/parttime/result/feature_div_cd/02gb/";
const ORIGIN: &str = "https://doctor.mynavi.jp";

/// Titles without this keyword are not reported.
pub const DEFAULT_KEYWORD: &str = "産業医";

const UPDATE_LABEL: &str = "求人更新日";
const NUMBER_LABEL: &str = "求人No.";

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("article.job-card").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2.job-title").unwrap());
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("h2.job-title a").unwrap());
static DT: Lazy<Selector> = Lazy::new(|| Selector::parse("dt").unwrap());
static JOB_NUMBER: Lazy<Selector> = Lazy::new(|| Selector::parse("div.job-number").unwrap());

#[derive(Debug, Clone)]
pub struct MynaviDoctor {
    listing_url: String,
    keyword: String,
}

impl MynaviDoctor {
    pub fn new() -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            keyword: DEFAULT_KEYWORD.to_string(),
        }
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<Option<Job>, ParseError> {
        let title = select_text(card, &TITLE).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        if !title.contains(&self.keyword) {
            return Ok(None);
        }

        let number_block = card
            .select(&JOB_NUMBER)
            .next()
            .map(element_words)
            .unwrap_or_default();
        let updated = parse_update_date(&number_block)?;

        let mut job = Job::new(title, Updated::Day(updated));
        job.url = select_href(card, &TITLE_LINK).and_then(|href| absolute_url(ORIGIN, href));
        job.location = labelled_value(card, "勤務地");
        job.reference = parse_job_number(&number_block).map(|value| Reference {
            label: "求人番号",
            value,
        });
        Ok(Some(job))
    }
}

impl Default for MynaviDoctor {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard for MynaviDoctor {
    fn name(&self) -> &str {
        "マイナビDOCTOR"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn parse_listing(&self, page: &str, target: NaiveDate) -> Result<Vec<Job>, ScrapeError> {
        let document = Html::parse_document(page);
        let cards = document.select(&CARD).map(|card| self.parse_card(card));
        Ok(keep_matching(self.name(), cards, FilterMode::ExactDate, target))
    }
}

/// The `YYYY/MM/DD` token following the update label.
fn parse_update_date(block: &str) -> Result<NaiveDate, ParseError> {
    let Some((_, tail)) = block.rsplit_once(UPDATE_LABEL) else {
        return Err(ParseError::MissingNode("update date"));
    };
    let cleaned = normalize_spaces(&tail.replace([':', '：'], "").replace(NUMBER_LABEL, ""));
    cleaned
        .split_whitespace()
        .next()
        .and_then(|token| NaiveDate::parse_from_str(token, "%Y/%m/%d").ok())
        .ok_or_else(|| ParseError::BadDate(block.to_string()))
}

/// The posting number following `求人No.`, if any.
fn parse_job_number(block: &str) -> Option<String> {
    let (_, tail) = block.rsplit_once(NUMBER_LABEL)?;
    normalize_spaces(tail)
        .trim_start_matches([' ', ':', '：'])
        .split_whitespace()
        .next()
        .map(str::to_string)
}

/// The `dd` that follows the `dt` whose text is `label`.
fn labelled_value(card: ElementRef<'_>, label: &str) -> Option<String> {
    let dt = card.select(&DT).find(|dt| element_text(*dt) == label)?;
    dt.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "dd")
        .map(element_text)
        .filter(|t| !t.is_empty())
}
