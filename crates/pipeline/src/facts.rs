//! FactExtractionChain: 0–5 short `label: value` facts for the key-fact card.
//!
//! AI-supplied facts are validated first. With fewer than three survivors a
//! fixed-priority chain of pattern extractors runs over the article text,
//! appending to the same capped, deduplicated list. Every candidate, AI or
//! extracted, passes the same validator.

use newsdeck_core::{FactEntry, KeyFactContent, RawFact};
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::debug;
use crate::contract::CONTRACTS;
use crate::text::{char_len, chars_after, chars_before, truncate_chars, word_count};

/// Text the extractors read, in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactSource<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub core_problem: &'a str,
    pub card4_key_sentence: &'a str,
    pub card4_explanation: &'a str,
}

impl FactSource<'_> {
    fn joined(&self) -> String {
        [
            self.title,
            self.body,
            self.core_problem,
            self.card4_key_sentence,
            self.card4_explanation,
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// AI facts at or above this count skip extraction.
const ENOUGH_AI_FACTS: usize = 3;

/// Characters around a match searched for a labeling keyword.
const CONTEXT_BEFORE: usize = 15;
const CONTEXT_AFTER: usize = 10;

static PERCENT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)\s*(?:%|퍼센트)").expect("valid pattern"));

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*(조|억|만|천)?\s*(원|달러|엔|유로)").expect("valid pattern")
});

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})년(?:\s*(\d{1,2})월)?(?:\s*(\d{1,2})일)?").expect("valid pattern")
});

static PERSON_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[\s(])([가-힣]{2,4})\s+(대통령|총리|장관|의원|대표|위원장|시장|지사|회장|사장|감독|교수|대변인)",
    )
    .expect("valid pattern")
});

static ORGANIZATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([가-힣]{2,12}(?:위원회|공사|공단|협회|연구원|연구소|재단|그룹|은행))")
        .expect("valid pattern")
});

static QUOTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[‘'「『"“]([^’'」』"”\n]{2,20})[’'」』"”]"#).expect("valid pattern"));

static CLAUSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?\n,]").expect("valid pattern"));

const CURRENCY_LABELS: &[(&str, &str)] = &[
    ("예산", "예산"),
    ("영업이익", "영업이익"),
    ("매출", "매출"),
    ("투자", "투자액"),
    ("수출", "수출액"),
    ("지원", "지원금"),
    ("피해", "피해액"),
    ("가격", "가격"),
    ("비용", "비용"),
    ("부채", "부채"),
    ("적자", "적자"),
    ("흑자", "흑자"),
];

const PERCENT_LABELS: &[(&str, &str)] = &[
    ("지지", "지지율"),
    ("실업", "실업률"),
    ("금리", "금리"),
    ("성장", "성장률"),
    ("물가", "물가상승률"),
    ("투표", "투표율"),
    ("상승", "상승률"),
    ("하락", "하락률"),
    ("감소", "감소율"),
    ("증가", "증가율"),
];

const DATE_LABELS: &[(&str, &str)] = &[
    ("시행", "시행일"),
    ("개최", "개최일"),
    ("발표", "발표일"),
    ("마감", "마감일"),
    ("출시", "출시일"),
];

const COUNTRIES: &[&str] = &[
    "미국", "중국", "일본", "러시아", "북한", "영국", "프랑스", "독일", "우크라이나",
    "이스라엘", "캐나다", "호주", "대만", "베트남",
];

const REGIONS: &[&str] = &[
    "서울", "부산", "대구", "인천", "광주", "대전", "울산", "세종", "경기도", "강원",
    "충북", "충남", "전북", "전남", "경북", "경남", "제주",
];

const CHANGE_KEYWORDS: &[&str] = &["증가", "감소", "상승", "하락", "확대", "축소", "인상", "인하"];
const OUTCOME_KEYWORDS: &[&str] = &["폐지", "도입", "통과", "개정", "합의", "결정", "무산", "시행"];

/// Words kept from the end of an outcome clause.
const OUTCOME_WORDS: usize = 5;

/// Capped, deduplicated fact list. Dedup key is the lowercased value.
#[derive(Debug, Default)]
struct FactSet {
    entries: Vec<FactEntry>,
}

impl FactSet {
    fn is_full(&self) -> bool {
        self.entries.len() >= CONTRACTS.max_facts
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Validate and append. Returns whether the fact was kept.
    fn push(&mut self, label: &str, value: &str) -> bool {
        if self.is_full() {
            return false;
        }
        let Some(fact) = validate_fact(label, value) else {
            return false;
        };
        let key = fact.value().to_lowercase();
        if self.entries.iter().any(|f| f.value().to_lowercase() == key) {
            return false;
        }
        self.entries.push(fact);
        true
    }
}

/// Check one `label: value` pair against the fact contract.
///
/// Over-long values are truncated; everything else that fails is rejected,
/// including out-of-range percentages.
pub fn validate_fact(label: &str, value: &str) -> Option<FactEntry> {
    let label = label.trim();
    let label_len = char_len(label);
    if label_len < CONTRACTS.fact_label_min || label_len > CONTRACTS.fact_label_max {
        return None;
    }

    let value = value.trim();
    let max_words = CONTRACTS.fact_value.max_words.unwrap_or(usize::MAX);
    if value.is_empty() || word_count(value) > max_words {
        return None;
    }
    let value = truncate_chars(value, CONTRACTS.fact_value.max_chars);
    if value.is_empty() || !CONTRACTS.fact_value.accepts_ending(&value) {
        return None;
    }

    let out_of_range = PERCENT_VALUE.captures_iter(&value).any(|caps| {
        caps[1]
            .parse::<f64>()
            .map_or(true, |pct| !(0.0..=100.0).contains(&pct))
    });
    if out_of_range {
        return None;
    }

    Some(FactEntry::new(label, value))
}

/// Produces the key-fact card content for one article.
pub struct FactExtractionChain;

impl FactExtractionChain {
    /// Validate AI facts, extract more when needed, and pick the card format.
    ///
    /// `summary` is the `(key sentence, explanation)` pair used when no fact
    /// survives.
    pub fn run(ai_facts: &[RawFact], source: &FactSource<'_>, summary: (&str, &str)) -> KeyFactContent {
        let mut set = FactSet::default();
        for raw in ai_facts {
            if let Some((label, value)) = raw.parts() {
                set.push(&label, &value);
            }
        }
        let ai_count = set.len();

        if ai_count < ENOUGH_AI_FACTS {
            extract_into(&mut set, &source.joined());
        }

        debug!(ai_facts = ai_count, total = set.len(), "Fact chain finished");

        if ai_count >= ENOUGH_AI_FACTS || set.len() > ai_count {
            KeyFactContent::Facts {
                facts: set.entries,
            }
        } else {
            KeyFactContent::Summary {
                key_sentence: summary.0.to_string(),
                explanation: summary.1.to_string(),
            }
        }
    }

    /// Only the extractor chain, starting from an empty list.
    pub fn extract(source: &FactSource<'_>) -> Vec<FactEntry> {
        let mut set = FactSet::default();
        extract_into(&mut set, &source.joined());
        set.entries
    }
}

type Extractor = fn(&str, &mut FactSet);

/// Numeric facts, then proper nouns, then outcomes.
const EXTRACTORS: &[Extractor] = &[
    extract_currency,
    extract_percent,
    extract_dates,
    extract_places,
    extract_people,
    extract_organizations,
    extract_quoted_names,
    extract_outcomes,
];

fn extract_into(set: &mut FactSet, text: &str) {
    for extractor in EXTRACTORS {
        if set.is_full() {
            break;
        }
        extractor(text, set);
    }
}

/// Label from the first table keyword found near `[start, end)`.
fn context_label(
    text: &str,
    start: usize,
    end: usize,
    table: &[(&str, &'static str)],
    default: &'static str,
) -> &'static str {
    let before = chars_before(text, start, CONTEXT_BEFORE);
    let after = chars_after(text, end, CONTEXT_AFTER);
    table
        .iter()
        .find(|&&(kw, _)| before.contains(kw))
        .or_else(|| table.iter().find(|&&(kw, _)| after.contains(kw)))
        .map_or(default, |&(_, label)| label)
}

fn extract_currency(text: &str, set: &mut FactSet) {
    for caps in CURRENCY.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let value = format!(
            "{}{}{}",
            &caps[1],
            caps.get(2).map_or("", |u| u.as_str()),
            &caps[3]
        );
        let label = context_label(text, m.start(), m.end(), CURRENCY_LABELS, "금액");
        set.push(label, &value);
    }
}

fn extract_percent(text: &str, set: &mut FactSet) {
    for caps in PERCENT_VALUE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let value = format!("{}%", &caps[1]);
        let label = context_label(text, m.start(), m.end(), PERCENT_LABELS, "증가율");
        set.push(label, &value);
    }
}

fn extract_dates(text: &str, set: &mut FactSet) {
    for caps in DATE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let mut value = format!("{}년", &caps[1]);
        if let Some(month) = caps.get(2) {
            value.push_str(&format!(" {}월", month.as_str()));
        }
        if let Some(day) = caps.get(3) {
            value.push_str(&format!(" {}일", day.as_str()));
        }
        let label = context_label(text, m.start(), m.end(), DATE_LABELS, "연도");
        set.push(label, &value);
    }
}

/// The earliest-mentioned country and region.
fn extract_places(text: &str, set: &mut FactSet) {
    for (table, label) in [(COUNTRIES, "국가"), (REGIONS, "지역")] {
        let first = table
            .iter()
            .filter_map(|name| text.find(name).map(|pos| (pos, *name)))
            .min_by_key(|(pos, _)| *pos);
        if let Some((_, name)) = first {
            set.push(label, name);
        }
    }
}

fn extract_people(text: &str, set: &mut FactSet) {
    for caps in PERSON_ROLE.captures_iter(text) {
        set.push(&caps[2], &caps[1]);
    }
}

fn extract_organizations(text: &str, set: &mut FactSet) {
    for caps in ORGANIZATION.captures_iter(text) {
        set.push("기관", &caps[1]);
    }
}

fn extract_quoted_names(text: &str, set: &mut FactSet) {
    for caps in QUOTED_NAME.captures_iter(text) {
        set.push("명칭", caps[1].trim());
    }
}

/// Short clauses ending on their last change or outcome keyword.
fn extract_outcomes(text: &str, set: &mut FactSet) {
    for clause in CLAUSE_SPLIT.split(text) {
        let hit = CHANGE_KEYWORDS
            .iter()
            .map(|kw| (kw, "변화"))
            .chain(OUTCOME_KEYWORDS.iter().map(|kw| (kw, "결과")))
            .filter_map(|(kw, label)| clause.rfind(kw).map(|pos| (pos + kw.len(), label)))
            .max_by_key(|(end, _)| *end);
        let Some((end, label)) = hit else { continue };

        let words: Vec<&str> = clause[..end].split_whitespace().collect();
        let phrase = words[words.len().saturating_sub(OUTCOME_WORDS)..].join(" ");
        set.push(label, &phrase);
    }
}
