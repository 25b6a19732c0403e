//! Pull-quote post-processing.
//!
//! Cleanup always runs before truncation so a cut never lands in the middle
//! of a phrase that cleanup would have removed.

use regex_lite::Regex;
use std::sync::LazyLock;
use crate::contract::CONTRACTS;
use crate::text::{char_len, truncate_chars};

static LEADING_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["'“”‘’「」『』]+"#).expect("valid pattern"));

/// Closing quote marks, keeping one terminal mark that follows them.
static TRAILING_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'“”‘’「」『』]+\s*([.!?。]?)$"#).expect("valid pattern"));

static ELLIPSIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"…+|\.{2,}").expect("valid pattern"));

static REPEATED_BANG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!{2,}").expect("valid pattern"));

static REPEATED_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?{2,}").expect("valid pattern"));

/// Reporter attribution: "...라고 밝혔다", "...으로 알려졌다".
static ATTRIBUTION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"라고\s*(?:밝혔다|말했다|전했다|밝혔습니다|말했습니다|전했습니다)",
        r"(?:로|으로)\s*(?:나타났다|드러났다|알려졌다|전해졌다)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid attribution pattern"))
    .collect()
});

static TRAILING_PARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:로|을|의|는|를)\s*$").expect("valid pattern"));

/// Curly and corner quote pairs; a mark without its partner is dropped.
const QUOTE_PAIRS: &[(char, char)] = &[('“', '”'), ('‘', '’'), ('「', '」'), ('『', '』')];

/// Normalize a raw quote. Idempotent.
pub fn process_quote(raw: &str) -> String {
    let contract = CONTRACTS.quote;
    let max = contract.max_chars;
    let mut text = cleanup(raw);

    // Each round strictly shortens the text.
    loop {
        let budget = if contract.accepts_ending(&text) { max } else { max - 1 };
        if char_len(&text) <= budget {
            break;
        }
        text = cleanup(&truncate_chars(&text, budget));
    }

    if !text.chars().any(char::is_alphanumeric) {
        return contract.fallback.to_string();
    }
    if !contract.accepts_ending(&text) {
        text.push('.');
    }
    text
}

/// Whether the text contains a reporter-attribution phrase.
pub fn has_attribution(text: &str) -> bool {
    ATTRIBUTION.iter().any(|re| re.is_match(text))
}

/// Repeat [`cleanup_pass`] until nothing changes. Every pass only removes
/// characters, so this terminates.
fn cleanup(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    loop {
        let next = cleanup_pass(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn cleanup_pass(input: &str) -> String {
    let mut text = ELLIPSIS.replace_all(input, "").into_owned();
    text = REPEATED_BANG.replace_all(&text, "!").into_owned();
    text = REPEATED_QUESTION.replace_all(&text, "?").into_owned();
    for re in ATTRIBUTION.iter() {
        text = re.replace_all(&text, "").into_owned();
    }

    text = LEADING_QUOTES.replace(text.trim(), "").into_owned();
    text = TRAILING_QUOTES.replace(text.trim(), "$1").into_owned();
    text = drop_unpaired_quotes(text.trim());
    TRAILING_PARTICLE.replace(text.trim(), "").trim().to_string()
}

fn drop_unpaired_quotes(text: &str) -> String {
    let count = |c: char| text.chars().filter(|&x| x == c).count();

    let mut drop: Vec<char> = Vec::new();
    for &(open, close) in QUOTE_PAIRS {
        if count(open) != count(close) {
            drop.extend([open, close]);
        }
    }
    for straight in ['"', '\''] {
        if count(straight) % 2 == 1 {
            drop.push(straight);
        }
    }

    if drop.is_empty() {
        text.to_string()
    } else {
        text.chars().filter(|c| !drop.contains(c)).collect()
    }
}
