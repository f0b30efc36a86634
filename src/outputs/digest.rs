//! Plain-text digest of a run's results.
//!
//! One block per source, in aggregation order:
//!
//! ```text
//! === マイナビ看護師 ===
//! タイトル: 産業保健師（日勤のみ）
//! 企業名: 株式会社サンプル
//! 求人番号: K-001
//! URL: https://kango.mynavi.jp/job/K-001/
//! 更新日: 2025-09-08
//! ------------------------------
//! ```

use crate::models::{Job, SourceJobs};
use std::fmt::Write;

/// Line emitted for a source with no matching jobs.
pub const NO_NEW_JOBS: &str = "新着求人はありませんでした。";

const RULE_WIDTH: usize = 30;

/// Render every source block, concatenated.
pub fn render_digest(results: &[SourceJobs]) -> String {
    results.iter().map(render_source).collect()
}

/// Render one source block.
pub fn render_source(source: &SourceJobs) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "=== {} ===", source.source);
    if source.jobs.is_empty() {
        let _ = writeln!(out, "{NO_NEW_JOBS}");
    }
    for job in &source.jobs {
        write_job(&mut out, job);
    }
    out
}

fn write_job(out: &mut String, job: &Job) {
    let _ = writeln!(out, "タイトル: {}", job.title);
    if let Some(corp) = &job.corp {
        let _ = writeln!(out, "企業名: {corp}");
    }
    if let Some(reference) = &job.reference {
        let _ = writeln!(out, "{}: {}", reference.label, reference.value);
    }
    if let Some(location) = &job.location {
        let _ = writeln!(out, "勤務地: {location}");
    }
    if let Some(url) = &job.url {
        let _ = writeln!(out, "URL: {url}");
    }
    let _ = writeln!(out, "更新日: {}", job.updated);
    for (label, value) in job.details.iter() {
        let _ = writeln!(out, "{label}: {value}");
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reference, Updated};
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    #[test]
    fn test_empty_source_renders_fixed_line() {
        let block = render_source(&SourceJobs {
            source: "Doctor Agent".into(),
            jobs: vec![],
        });
        assert_eq!(block, "=== Doctor Agent ===\n新着求人はありませんでした。\n");
    }

    #[test]
    fn test_job_fields_in_order() {
        let mut job = Job::new(
            "産業医",
            Updated::Day(NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()),
        );
        job.corp = Some("株式会社A".into());
        job.reference = Some(Reference { label: "求人番号", value: "101".into() });
        job.location = Some("東京都".into());
        job.url = Some("https://example.jp/101".into());
        job.details.insert("給与", "10万円");

        let block = render_source(&SourceJobs { source: "S".into(), jobs: vec![job] });
        assert_eq!(
            block,
            "=== S ===\n\
             タイトル: 産業医\n\
             企業名: 株式会社A\n\
             求人番号: 101\n\
             勤務地: 東京都\n\
             URL: https://example.jp/101\n\
             更新日: 2025-09-08\n\
             給与: 10万円\n\
             ------------------------------\n"
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let job = Job::new("T", Updated::At(jst.with_ymd_and_hms(2025, 9, 8, 13, 0, 0).unwrap()));

        let block = render_source(&SourceJobs { source: "S".into(), jobs: vec![job] });
        assert_eq!(
            block,
            "=== S ===\nタイトル: T\n更新日: 2025-09-08 13:00:00\n------------------------------\n"
        );
    }

    #[test]
    fn test_digest_concatenates_sources_in_order() {
        let results = vec![
            SourceJobs { source: "first".into(), jobs: vec![] },
            SourceJobs { source: "second".into(), jobs: vec![] },
        ];
        let digest = render_digest(&results);
        assert_eq!(
            digest,
            format!("=== first ===\n{NO_NEW_JOBS}\n=== second ===\n{NO_NEW_JOBS}\n")
        );
    }
}
