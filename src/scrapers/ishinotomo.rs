//! dRサイト (ishinotomo-tensyoku.com) part-time occupational physician listings.
//!
//! Each result is an `li.result_list_content.parttime`. The update stamp reads
//! `2025/09/08 13:02:14　ID:69406`: local time, then a full-width space, then an
//! ID token. The time is already JST, so the configured zone is attached
//! without conversion.

use super::{JobBoard, keep_matching};
use crate::config::Settings;
use crate::error::{ParseError, ScrapeError};
use crate::models::{FilterMode, Job, Updated};
use crate::utils::{absolute_url, select_href, select_text};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const LISTING_URL: &str =
    "https://ishinotomo-tensyoku.com/parttime/subject/%E7%94%A3%E6%A5%AD%E5%8C%BB/";
const ORIGIN: &str = "https://ishinotomo-tensyoku.com";

static ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.result_list_content.parttime").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2.title_type_2").unwrap());
static UPDATED: Lazy<Selector> = Lazy::new(|| Selector::parse("p.update_date").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.link_recruit_info").unwrap());
static INFO_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.offer_info_container dl").unwrap());
static DT: Lazy<Selector> = Lazy::new(|| Selector::parse("dt").unwrap());
static DD: Lazy<Selector> = Lazy::new(|| Selector::parse("dd").unwrap());

#[derive(Debug, Clone)]
pub struct Ishinotomo {
    listing_url: String,
    zone: FixedOffset,
    filter: FilterMode,
}

impl Ishinotomo {
    pub fn new(settings: &Settings) -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            zone: settings.zone,
            filter: settings.dr_filter,
        }
    }

    fn parse_item(&self, item: ElementRef<'_>) -> Result<Job, ParseError> {
        let title = select_text(item, &TITLE).ok_or(ParseError::MissingNode("title"))?;
        let stamp = select_text(item, &UPDATED).ok_or(ParseError::MissingNode("update date"))?;
        let updated = parse_update_stamp(&stamp, self.zone)?;

        let mut job = Job::new(title, updated);
        job.url = select_href(item, &LINK).and_then(|href| absolute_url(ORIGIN, href));

        for row in item.select(&INFO_ROW) {
            if let Some(label) = select_text(row, &DT) {
                job.details.insert_opt(label, select_text(row, &DD));
            }
        }
        Ok(job)
    }
}

impl JobBoard for Ishinotomo {
    fn name(&self) -> &str {
        "dRサイト"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn parse_listing(&self, page: &str, target: NaiveDate) -> Result<Vec<Job>, ScrapeError> {
        let document = Html::parse_document(page);
        let items = document
            .select(&ITEM)
            .map(|item| self.parse_item(item).map(Some));
        Ok(keep_matching(self.name(), items, self.filter, target))
    }
}

/// Parse `YYYY/MM/DD HH:MM:SS` from the text before the first full-width space.
fn parse_update_stamp(stamp: &str, zone: FixedOffset) -> Result<Updated, ParseError> {
    let head = stamp.split('\u{3000}').next().unwrap_or_default().trim();
    NaiveDateTime::parse_from_str(head, "%Y/%m/%d %H:%M:%S")
        .ok()
        .and_then(|naive| naive.and_local_timezone(zone).single())
        .map(Updated::At)
        .ok_or_else(|| ParseError::BadDate(stamp.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <ul>
          <li class="result_list_content parttime">
            <h2 class="title_type_2">【東京都港区】産業医 月1回</h2>
            <p class="update_date">2025/09/08 13:02:14　ID:69406</p>
            <a class="link_recruit_info" href="/parttime/detail/69406/">詳細</a>
            <div class="offer_info_container">
              <dl><dt>勤務地</dt><dd>東京都港区</dd></dl>
              <dl><dt>給与</dt><dd>50,000円/回</dd></dl>
              <dl><dt>備考</dt></dl>
            </div>
          </li>
          <li class="result_list_content parttime">
            <h2 class="title_type_2">壊れた更新日</h2>
            <p class="update_date">更新日不明</p>
          </li>
          <li class="result_list_content parttime">
            <p class="update_date">2025/09/08 09:00:00　ID:1</p>
          </li>
          <li class="result_list_content parttime">
            <h2 class="title_type_2">【大阪府】産業医</h2>
            <p class="update_date">2025/09/08 23:59:59　ID:70001</p>
          </li>
          <li class="result_list_content parttime">
            <h2 class="title_type_2">前日の求人</h2>
            <p class="update_date">2025/09/07 10:00:00　ID:60000</p>
          </li>
        </ul>"#;

    fn board() -> Ishinotomo {
        Ishinotomo::new(&Settings::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_listing_matches_target_date() {
        let jobs = board().parse_listing(PAGE, date(2025, 9, 8)).unwrap();

        assert_eq!(jobs.len(), 2);
        let first = &jobs[0];
        assert_eq!(first.title, "【東京都港区】産業医 月1回");
        assert_eq!(first.updated.to_string(), "2025-09-08 13:02:14");
        assert_eq!(
            first.url.as_deref(),
            Some("https://ishinotomo-tensyoku.com/parttime/detail/69406/")
        );
        assert_eq!(first.details.get("勤務地"), Some("東京都港区"));
        assert_eq!(first.details.get("給与"), Some("50,000円/回"));
        assert_eq!(first.details.get("備考"), None);

        assert_eq!(jobs[1].title, "【大阪府】産業医");
        assert_eq!(jobs[1].url, None);
    }

    #[test]
    fn test_previous_day_excluded() {
        let jobs = board().parse_listing(PAGE, date(2025, 9, 7)).unwrap();
        let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["前日の求人"]);
    }

    #[test]
    fn test_single_item_against_two_targets() {
        let page = r#"<li class="result_list_content parttime">
            <h2 class="title_type_2">T</h2>
            <p class="update_date">2025/09/08 13:02:14　ID:69406</p></li>"#;

        let jobs = board().parse_listing(page, date(2025, 9, 8)).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].updated.to_string(), "2025-09-08 13:02:14");

        assert!(board().parse_listing(page, date(2025, 9, 7)).unwrap().is_empty());
    }

    #[test]
    fn test_zone_is_attached_not_converted() {
        let zone = FixedOffset::east_opt(0).unwrap();
        let updated = parse_update_stamp("2025/09/08 01:00:00　ID:1", zone).unwrap();
        assert_eq!(updated.to_string(), "2025-09-08 01:00:00");
        assert_eq!(updated.date(), date(2025, 9, 8));
    }

    #[test]
    fn test_cutoff_filter_mode() {
        let settings = Settings {
            dr_filter: FilterMode::UpdatedAfter(
                date(2025, 9, 8).and_hms_opt(13, 0, 0).unwrap(),
            ),
            ..Settings::default()
        };
        let jobs = Ishinotomo::new(&settings)
            .parse_listing(PAGE, date(2000, 1, 1))
            .unwrap();
        let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["【東京都港区】産業医 月1回", "【大阪府】産業医"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let target = date(2025, 9, 8);
        assert_eq!(
            board().parse_listing(PAGE, target).unwrap(),
            board().parse_listing(PAGE, target).unwrap()
        );
    }

    #[test]
    fn test_bad_stamp() {
        let zone = Settings::default().zone;
        assert!(matches!(
            parse_update_stamp("2025-09-08 13:02:14", zone),
            Err(ParseError::BadDate(_))
        ));
    }
}
