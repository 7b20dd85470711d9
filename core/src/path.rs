//! Segment joining, URL normalization and parameter stringification.

use serde_json::Value;

pub const SEPARATOR: char = '/';

/// Stands in for `-` in segment names that cannot spell a hyphen.
pub const HYPHEN_ESCAPE: char = '$';

/// Join segments with `/`, skipping empty ones and decoding `$` to `-`.
///
/// Order is preserved and nothing is deduplicated. The result is not
/// normalized; see [`normalize_url`].
pub fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(SEPARATOR);
        }
        joined.extend(
            segment
                .chars()
                .map(|c| if c == HYPHEN_ESCAPE { '-' } else { c }),
        );
    }
    joined
}

/// Collapse runs of `/` and guarantee exactly one leading `/`.
///
/// Empty input yields `"/"`. Trailing separators are kept.
pub fn normalize_url(path: &str) -> String {
    if path.is_empty() {
        return SEPARATOR.to_string();
    }
    let mut normalized = String::with_capacity(path.len() + 1);
    if !path.starts_with(SEPARATOR) {
        normalized.push(SEPARATOR);
    }
    let mut previous_was_separator = false;
    for c in path.chars() {
        let is_separator = c == SEPARATOR;
        if !(is_separator && previous_was_separator) {
            normalized.push(c);
        }
        previous_was_separator = is_separator;
    }
    normalized
}

/// String form of a call argument used for parameter insertion.
///
/// Strings are taken verbatim, numbers and booleans use their JSON text,
/// `null` becomes `"null"`, arrays join their stringified elements with `,`
/// (null elements contribute nothing) and objects become compact JSON.
/// Integral floats drop their fraction, so `1.0` inserts `1`.
pub fn stringify_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                // -0.0 prints as "0" too.
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{f:.0}")
                }
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify_param(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
