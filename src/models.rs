//! Data models shared by every job board scraper.
//!
//! This module defines the record shape all sources are normalized into:
//! - [`Job`]: one posting, with a few well-known optional fields
//! - [`Updated`]: the "last modified" value, with or without time of day
//! - [`Details`]: open-ended, source-specific label/value pairs
//! - [`SourceJobs`]: the jobs one source produced for a run
//! - [`FilterMode`]: how a scraper decides which postings are new

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Title used when a posting's title cannot be extracted.
pub const UNKNOWN_TITLE: &str = "タイトル不明";

/// A job posting as normalized from any source.
///
/// The source the job came from is not stored here; it is carried by the
/// [`SourceJobs`] entry the job is grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Human-readable title; [`UNKNOWN_TITLE`] when unextractable.
    pub title: String,
    /// Employer or corporate name, when the source lists one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp: Option<String>,
    /// Site-specific posting number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Work location, when the source lists one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Absolute link to the posting.
    pub url: Option<String>,
    /// When the source says the posting was last updated.
    pub updated: Updated,
    /// Remaining source-specific fields.
    #[serde(skip_serializing_if = "Details::is_empty")]
    pub details: Details,
}

impl Job {
    /// A job with only the mandatory fields set.
    pub fn new(title: impl Into<String>, updated: Updated) -> Self {
        Self {
            title: title.into(),
            corp: None,
            reference: None,
            location: None,
            url: None,
            updated,
            details: Details::default(),
        }
    }
}

/// A labelled posting number, e.g. `求人番号: 12345`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub label: &'static str,
    pub value: String,
}

/// A "last updated" value normalized to the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Updated {
    /// Time of day is known.
    At(DateTime<FixedOffset>),
    /// The source only reports a calendar date.
    Day(NaiveDate),
}

impl Updated {
    /// The calendar day this value falls on, in its own zone.
    pub fn date(&self) -> NaiveDate {
        match self {
            Updated::At(dt) => dt.date_naive(),
            Updated::Day(d) => *d,
        }
    }
}

impl fmt::Display for Updated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updated::At(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Updated::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Updated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Insertion-ordered label → value pairs.
///
/// Labels are unique: inserting an existing label replaces its value in place.
/// Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details(Vec<(String, String)>);

impl Details {
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let (label, value) = (label.into(), value.into());
        if value.is_empty() {
            return;
        }
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.0.push((label, value)),
        }
    }

    /// Insert only when a value is present.
    pub fn insert_opt(&mut self, label: impl Into<String>, value: Option<String>) {
        if let Some(value) = value {
            self.insert(label, value);
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// How a scraper decides whether a posting counts as new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// The update day equals the target date.
    #[default]
    ExactDate,
    /// The update is strictly later than a fixed local timestamp. Date-only
    /// values compare by day against the cutoff's day.
    UpdatedAfter(NaiveDateTime),
}

impl FilterMode {
    pub fn accepts(&self, updated: &Updated, target: NaiveDate) -> bool {
        match self {
            FilterMode::ExactDate => updated.date() == target,
            FilterMode::UpdatedAfter(cutoff) => match updated {
                Updated::At(dt) => dt.naive_local() > *cutoff,
                Updated::Day(d) => *d > cutoff.date(),
            },
        }
    }
}

/// All jobs one source produced for a run, in the order the source listed them.
#[derive(Debug, Clone, Serialize)]
pub struct SourceJobs {
    pub source: String,
    pub jobs: Vec<Job>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_updated_display_with_time() {
        let dt = jst().with_ymd_and_hms(2025, 9, 8, 13, 2, 14).unwrap();
        assert_eq!(Updated::At(dt).to_string(), "2025-09-08 13:02:14");
    }

    #[test]
    fn test_updated_display_date_only() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        assert_eq!(Updated::Day(d).to_string(), "2025-09-08");
    }

    #[test]
    fn test_updated_date_uses_own_zone() {
        let dt = jst().with_ymd_and_hms(2025, 9, 8, 23, 30, 0).unwrap();
        assert_eq!(
            Updated::At(dt).date(),
            NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()
        );
    }

    #[test]
    fn test_details_keep_order_and_replace() {
        let mut details = Details::default();
        details.insert("給与", "10,000円");
        details.insert("施設名", "F");
        details.insert("給与", "12,000円");
        details.insert("住所", "");
        details.insert_opt("備考", None);

        let pairs: Vec<_> = details.iter().collect();
        assert_eq!(pairs, vec![("給与", "12,000円"), ("施設名", "F")]);
        assert_eq!(details.get("施設名"), Some("F"));
        assert_eq!(details.get("住所"), None);
    }

    #[test]
    fn test_exact_date_filter() {
        let target = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        let dt = jst().with_ymd_and_hms(2025, 9, 8, 0, 0, 0).unwrap();
        assert!(FilterMode::ExactDate.accepts(&Updated::At(dt), target));
        assert!(!FilterMode::ExactDate.accepts(&Updated::At(dt), target.pred_opt().unwrap()));
        assert!(!FilterMode::ExactDate.accepts(&Updated::At(dt), target.succ_opt().unwrap()));
    }

    #[test]
    fn test_updated_after_filter() {
        let cutoff = NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mode = FilterMode::UpdatedAfter(cutoff);
        let target = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

        let later = jst().with_ymd_and_hms(2025, 9, 8, 12, 0, 1).unwrap();
        let same = jst().with_ymd_and_hms(2025, 9, 8, 12, 0, 0).unwrap();
        assert!(mode.accepts(&Updated::At(later), target));
        assert!(!mode.accepts(&Updated::At(same), target));
        assert!(!mode.accepts(&Updated::Day(cutoff.date()), target));
        assert!(mode.accepts(&Updated::Day(cutoff.date().succ_opt().unwrap()), target));
    }

    #[test]
    fn test_job_serialization_skips_absent_fields() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        let mut job = Job::new("T", Updated::Day(d));
        job.details.insert("施設名", "F");

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["updated"], "2025-09-08");
        assert_eq!(json["details"]["施設名"], "F");
        assert!(json["url"].is_null());
        assert!(json.get("corp").is_none());
        assert!(json.get("reference").is_none());
    }
}
