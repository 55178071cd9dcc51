//! Version-label ordering.
//!
//! Version labels are dot-separated segments. Numeric segments compare by
//! value, via zero-padding to a fixed width, so `"2" < "10" < "10.1"`.
//! Non-numeric segments compare lexicographically as-is.

use std::cmp::Ordering;

const SEGMENT_WIDTH: usize = 12;

/// Sortable rendering of a version label.
pub fn sort_key(version: &str) -> String {
    let mut key = String::with_capacity(version.len() + SEGMENT_WIDTH);
    for (i, segment) in version.split('.').enumerate() {
        if i > 0 {
            key.push('.');
        }
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            for _ in segment.len()..SEGMENT_WIDTH {
                key.push('0');
            }
        }
        key.push_str(segment);
    }
    key
}

/// Order two version labels.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_segments_compare_by_value() {
        assert_eq!(compare("2", "10"), Ordering::Less);
        assert_eq!(compare("10", "10.1"), Ordering::Less);
        assert_eq!(compare("10.2", "10.10"), Ordering::Less);
        assert_eq!(compare("3", "3"), Ordering::Equal);
        assert_eq!(compare("11", "9"), Ordering::Greater);
    }

    #[test]
    fn test_sorting_a_list() {
        let mut versions = vec!["10", "2", "1", "10.1", "3"];
        versions.sort_by(|a, b| compare(a, b));
        assert_eq!(versions, vec!["1", "2", "3", "10", "10.1"]);
    }

    #[test]
    fn test_non_numeric_segments_sort_lexicographically() {
        assert_eq!(compare("1.alpha", "1.beta"), Ordering::Less);
    }
}
