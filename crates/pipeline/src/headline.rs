//! Cover headline post-processing.
//!
//! At most two lines, each 2–10 characters, never ending on an incomplete
//! particle or connective. A line that cannot be repaired is replaced with
//! one derived from the article title.

use regex_lite::Regex;
use std::sync::LazyLock;
use crate::contract::CONTRACTS;
use crate::suffix::{has_bad_ending, strip_trailing};
use crate::text::{char_len, collapse_whitespace, truncate_chars};

static QUOTE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'“”‘’]"#).expect("valid quote pattern"));

static ELLIPSIS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[…\.]{2,}").expect("valid ellipsis pattern"));

/// Characters kept from the title when even the truncated title is unusable.
const STEM_CHARS: usize = 7;

/// Normalize a raw headline. `title` is the badge-stripped article title.
///
/// Idempotent: processing the output again returns it unchanged.
pub fn process_headline(raw: &str, title: &str) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(CONTRACTS.headline_max_lines);

    for line in raw
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(CONTRACTS.headline_max_lines)
    {
        let processed = process_line(line).unwrap_or_else(|| title_fallback(title));
        if !lines.contains(&processed) {
            lines.push(processed);
        }
    }

    if lines.is_empty() {
        lines.push(title_fallback(title));
    }
    lines.join("\n")
}

/// Clean, truncate and strip one line. `None` when the result is unusable.
fn process_line(line: &str) -> Option<String> {
    let cleaned = cosmetic(line);
    let truncated = truncate_chars(&cleaned, CONTRACTS.headline_line.max_chars);
    let stripped = strip_trailing(&truncated);
    usable(&stripped).then_some(stripped)
}

fn cosmetic(line: &str) -> String {
    let without_quotes = QUOTE_CHARS.replace_all(line, "");
    ELLIPSIS_RUN.replace_all(&without_quotes, "").trim().to_string()
}

fn usable(line: &str) -> bool {
    char_len(line) >= CONTRACTS.headline_min_chars && !has_bad_ending(line)
}

/// A headline line derived from the article title.
fn title_fallback(title: &str) -> String {
    let cleaned = cosmetic(&collapse_whitespace(title));

    let truncated = truncate_chars(&cleaned, CONTRACTS.headline_line.max_chars);
    let candidate = strip_trailing(&truncated);
    if usable(&candidate) {
        return candidate;
    }

    let stem = strip_trailing(&truncate_chars(&cleaned, STEM_CHARS));
    if stem.is_empty() {
        CONTRACTS.headline_line.fallback.to_string()
    } else {
        format!("{stem} 이슈")
    }
}
