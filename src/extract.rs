//! Recover a JSON array embedded in a non-JSON text block.
//!
//! Pages often ship their data as part of a script such as
//! `window.__STATE__ = {..., "offers":[...], ...};`. The surrounding text is not
//! valid JSON, so instead of parsing the whole document we locate the key and
//! cut out the array by tracking bracket depth.

/// Return the array literal that follows `"key":` in `text`.
///
/// Only the first occurrence of the key is considered. Whitespace between the
/// colon and the opening `[` is allowed. Brackets inside JSON string literals
/// do not count towards depth.
///
/// Returns `None` when the key is absent, when its value is not an array, or
/// when the array is never closed.
///
/// # Examples
///
/// ```ignore
/// let text = r#"var s = {"key":[1,[2,3],4], "other": 5};"#;
/// assert_eq!(extract_json_array(text, "key"), Some("[1,[2,3],4]"));
/// ```
pub fn extract_json_array<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("\"{key}\":");
    let after_key = text.find(&needle)? + needle.len();

    let rest = &text[after_key..];
    let start = after_key + (rest.len() - rest.trim_start().len());

    // Only ASCII bytes are inspected; UTF-8 continuation bytes never match them,
    // so every index where we stop is a char boundary.
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
