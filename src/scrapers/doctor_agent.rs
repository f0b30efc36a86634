//! Doctor Agent part-time listings.
//!
//! The update date and the case number live in one free-text paragraph
//! (`掲載更新日 : 2025年09月08日 ／ 案件番号 : A-123`), so they are pulled out
//! with regular expressions. When the card has no usable link, the case number
//! is used to build the detail URL.

use super::{JobBoard, keep_matching};
use crate::error::{ParseError, ScrapeError};
use crate::models::{FilterMode, Job, Reference, UNKNOWN_TITLE, Updated};
use crate::utils::{absolute_url, select_href, select_text};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const LISTING_URL: &str = "https://www.doctor-agent.com/part-time/result?t=0&w2=4&x=1";
const ORIGIN: &str = "https://www.doctor-agent.com";

static ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.jobOfferDetailContent ul li._content").unwrap());
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("h3._title a").unwrap());
static INFO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.text-size-smaller.text-color-pale").unwrap());

static UPDATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"掲載更新日\s*[:：]\s*(\d{4}年\d{2}月\d{2}日)").unwrap());
static CASE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"案件番号\s*[:：]\s*([A-Za-z0-9\-]+)").unwrap());

#[derive(Debug, Clone)]
pub struct DoctorAgent {
    listing_url: String,
}

impl DoctorAgent {
    pub fn new() -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
        }
    }

    fn parse_item(&self, item: ElementRef<'_>) -> Result<Job, ParseError> {
        let title = select_text(item, &TITLE_LINK).unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let info: String = item
            .select(&INFO)
            .next()
            .ok_or(ParseError::MissingNode("info paragraph"))?
            .text()
            .collect();
        let raw_date = UPDATED_RE
            .captures(&info)
            .and_then(|c| c.get(1))
            .ok_or(ParseError::MissingNode("update date"))?
            .as_str();
        let updated = NaiveDate::parse_from_str(raw_date, "%Y年%m月%d日")
            .map_err(|_| ParseError::BadDate(raw_date.to_string()))?;
        let case_id = CASE_ID_RE
            .captures(&info)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let mut job = Job::new(title, Updated::Day(updated));
        job.url = select_href(item, &TITLE_LINK)
            .filter(|href| !href.starts_with('#') && !href.starts_with("javascript:"))
            .and_then(|href| absolute_url(ORIGIN, href))
            .or_else(|| case_id.as_deref().map(detail_url));
        job.reference = case_id.map(|value| Reference {
            label: "案件番号",
            value,
        });
        Ok(job)
    }
}

impl Default for DoctorAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard for DoctorAgent {
    fn name(&self) -> &str {
        "Doctor Agent"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn parse_listing(&self, page: &str, target: NaiveDate) -> Result<Vec<Job>, ScrapeError> {
        let document = Html::parse_document(page);
        let items = document
            .select(&ITEM)
            .map(|item| self.parse_item(item).map(Some));
        Ok(keep_matching(self.name(), items, FilterMode::ExactDate, target))
    }
}

fn detail_url(case_id: &str) -> String {
    format!("{ORIGIN}/part-time/Detail/{case_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="jobOfferDetailContent"><ul>
          <li class="_content">
            <h3 class="_title"><a>【東京】産業医 嘱託 月1回</a></h3>
            <p class="text-size-smaller text-color-pale">
              掲載更新日 : 2025年09月08日 ／ 案件番号 : PT-1001
            </p>
          </li>
          <li class="_content">
            <h3 class="_title"><a href="/part-time/Detail/PT-1002?from=list">【神奈川】産業医</a></h3>
            <p class="text-size-smaller text-color-pale">掲載更新日：2025年09月08日 案件番号：PT-1002</p>
          </li>
          <li class="_content">
            <h3 class="_title"><a href="/x">日付なし</a></h3>
            <p class="text-size-smaller text-color-pale">案件番号 : PT-1003</p>
          </li>
          <li class="_content">
            <p class="text-size-smaller text-color-pale">掲載更新日 : 2025年09月08日</p>
          </li>
          <li class="_content">
            <h3 class="_title"><a>前日</a></h3>
            <p class="text-size-smaller text-color-pale">掲載更新日 : 2025年09月07日 ／ 案件番号 : PT-1005</p>
          </li>
        </ul></div>"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_listing() {
        let jobs = DoctorAgent::new().parse_listing(PAGE, date(2025, 9, 8)).unwrap();
        assert_eq!(jobs.len(), 3);

        assert_eq!(jobs[0].title, "【東京】産業医 嘱託 月1回");
        assert_eq!(
            jobs[0].url.as_deref(),
            Some("https://www.doctor-agent.com/part-time/Detail/PT-1001")
        );
        assert_eq!(jobs[0].reference.as_ref().unwrap().label, "案件番号");
        assert_eq!(jobs[0].reference.as_ref().unwrap().value, "PT-1001");
        assert_eq!(jobs[0].updated.to_string(), "2025-09-08");

        assert_eq!(
            jobs[1].url.as_deref(),
            Some("https://www.doctor-agent.com/part-time/Detail/PT-1002?from=list")
        );

        assert_eq!(jobs[2].title, UNKNOWN_TITLE);
        assert_eq!(jobs[2].url, None);
        assert_eq!(jobs[2].reference, None);
    }

    #[test]
    fn test_other_day() {
        let jobs = DoctorAgent::new().parse_listing(PAGE, date(2025, 9, 7)).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "前日");
    }

    #[test]
    fn test_empty_page() {
        let jobs = DoctorAgent::new()
            .parse_listing("<html><body></body></html>", date(2025, 9, 8))
            .unwrap();
        assert!(jobs.is_empty());
    }
}
