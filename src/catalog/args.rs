//! `%1`..`%99` and `%n` placeholder handling.

use std::collections::BTreeSet;

/// A placeholder found in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    /// Byte offset of the `%`.
    start: usize,
    /// Byte offset just past the marker.
    end: usize,
    /// 1-based argument number.
    number: u8,
}

/// Scans `%N`, `%NN` and the localized `%LN` forms.
fn markers(text: &str) -> impl Iterator<Item = Marker> + '_ {
    let bytes = text.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() {
            let start = pos;
            pos += 1;
            if bytes.get(start) != Some(&b'%') {
                continue;
            }
            let mut cursor = pos;
            if bytes.get(cursor) == Some(&b'L') {
                cursor += 1;
            }
            let Some(first @ b'1'..=b'9') = bytes.get(cursor).copied() else {
                continue;
            };
            let mut number = first - b'0';
            cursor += 1;
            if let Some(second @ b'0'..=b'9') = bytes.get(cursor).copied() {
                number = number * 10 + (second - b'0');
                cursor += 1;
            }
            pos = cursor;
            return Some(Marker { start, end: cursor, number });
        }
        None
    })
}

/// Numbers of the positional placeholders used in `text`.
#[must_use]
pub fn placeholders(text: &str) -> BTreeSet<u8> {
    markers(text).map(|marker| marker.number).collect()
}

/// Replaces `%1`..`%99` with the matching positional argument.
///
/// Markers without an argument are kept verbatim.
#[must_use]
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;
    for marker in markers(template) {
        let Some(arg) = args.get(usize::from(marker.number) - 1) else {
            continue;
        };
        result.push_str(template.get(last..marker.start).unwrap_or_default());
        result.push_str(arg);
        last = marker.end;
    }
    result.push_str(template.get(last..).unwrap_or_default());
    result
}

/// Replaces `%n` and `%Ln` with the count.
#[must_use]
pub fn substitute_count(template: &str, n: i64) -> String {
    let count = n.to_string();
    template.replace("%Ln", &count).replace("%n", &count)
}
