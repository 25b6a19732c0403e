//! Character-based string helpers. Lengths are Unicode scalar counts, never
//! bytes, so Hangul and ASCII count the same.

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max` characters of `s`, trimmed.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim().to_string(),
        None => s.trim().to_string(),
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Up to `n` characters immediately before byte offset `at`.
pub(crate) fn chars_before(s: &str, at: usize, n: usize) -> String {
    let head = &s[..at];
    let skip = char_len(head).saturating_sub(n);
    head.chars().skip(skip).collect()
}

/// Up to `n` characters starting at byte offset `at`.
pub(crate) fn chars_after(s: &str, at: usize, n: usize) -> String {
    s[at..].chars().take(n).collect()
}
