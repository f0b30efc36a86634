//! Utility functions for text extraction, link resolution and logging.
//!
//! This module provides helpers shared by the scrapers:
//! - Element text collection with per-node trimming
//! - Relative link resolution against a site origin
//! - String truncation for log previews

use itertools::Itertools;
use scraper::{ElementRef, Selector};
use url::Url;

/// Concatenate an element's text nodes, trimming each one.
///
/// Markup like `<p>\n  更新日：<span>2025/09/08</span>\n</p>` becomes
/// `更新日：2025/09/08`. Whitespace inside a single text node is kept.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Like [`element_text`], but non-empty text nodes are joined with a space.
///
/// Use this where adjacent nodes hold separate tokens that must not run together.
pub fn element_words(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" ")
}

/// Text of the first descendant matching `selector`, if it has any.
pub fn select_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// `href` of the first descendant matching `selector`.
pub fn select_href<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    element
        .select(selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

/// Resolve `href` against `origin`, leaving absolute links unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     absolute_url("https://kango.mynavi.jp", "/job/1/"),
///     Some("https://kango.mynavi.jp/job/1/".to_string())
/// );
/// ```
pub fn absolute_url(origin: &str, href: &str) -> Option<String> {
    Url::parse(origin)
        .and_then(|base| base.join(href))
        .map(String::from)
        .ok()
}

/// Replace full-width (U+3000) and no-break (U+00A0) spaces with ASCII spaces.
pub fn normalize_spaces(s: &str) -> String {
    s.replace(['\u{3000}', '\u{a0}'], " ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a char boundary) with
/// an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
