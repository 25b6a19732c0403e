//! DeckAssembler: the canonical seven-card deck and its 5- and 9-card
//! variants. Inputs are already contract-valid; this module only selects,
//! orders and renumbers.

use newsdeck_core::{
    BeforeAfterChart, CardDeck, CardRecord, CardType, DeckBadge, DeckSize, ImageSlotAssignment,
    KeyFactContent, NormalizedCardContent,
};
use regex_lite::Regex;
use std::sync::LazyLock;
use crate::contract::CONTRACTS;
use crate::text::truncate_chars;

/// Canonical indices kept by the 5-card deck.
const FIVE_CARD_SLOTS: [usize; 5] = [0, 1, 4, 5, 6];

/// Canonical indices appended (as copies) by the 9-card deck.
const NINE_CARD_EXTRAS: [usize; 2] = [3, 4];

/// Bar heights when the before/after values are not both numeric.
const DEFAULT_BEFORE_PCT: f64 = 40.0;
const DEFAULT_AFTER_PCT: f64 = 100.0;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid pattern"));

/// Everything the assembler reads.
pub struct DeckInputs<'a> {
    pub content: &'a NormalizedCardContent,
    pub key_fact: &'a KeyFactContent,
    pub images: &'a ImageSlotAssignment,
    pub source_url: &'a str,
    pub category: &'a str,
    pub category_label: &'a str,
    pub badge: Option<&'a DeckBadge>,
}

pub struct DeckAssembler;

impl DeckAssembler {
    pub fn assemble(inputs: &DeckInputs<'_>, size: DeckSize) -> CardDeck {
        let base = Self::canonical(inputs);
        let cards = derive_variant(&base, size);

        CardDeck {
            template: format!("시사 {}장", size.count()),
            size,
            category: inputs.category.to_string(),
            category_label: inputs.category_label.to_string(),
            badge: inputs.badge.cloned(),
            summary: deck_summary(inputs.content),
            cards,
        }
    }

    /// The seven canonical cards, slots 1–7.
    pub fn canonical(inputs: &DeckInputs<'_>) -> Vec<CardRecord> {
        let c = inputs.content;
        let card = |index: usize, card_type: CardType, title: &str, body: String| CardRecord {
            slot: index + 1,
            card_type,
            title: title.to_string(),
            body,
            image: inputs.images.get(index).to_string(),
            link: None,
            chart: None,
        };

        let quote_body = [c.quote.as_str(), c.quote_speaker.as_str(), c.quote_context.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let (key_title, key_body) = match inputs.key_fact {
            KeyFactContent::Facts { facts } => (
                "핵심 팩트",
                facts.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"),
            ),
            KeyFactContent::Summary {
                key_sentence,
                explanation,
            } => ("문제점 요약", format!("{key_sentence}\n{explanation}")),
        };

        let mut key_card = card(3, CardType::KeyFact, key_title, key_body);
        key_card.chart = Some(parse_before_after(&c.before_after));

        let mut closing = card(6, CardType::Closing, "마무리", c.reader_question.clone());
        if !inputs.source_url.trim().is_empty() {
            closing.link = Some(inputs.source_url.trim().to_string());
        }

        vec![
            card(0, CardType::Cover, &c.headline, String::new()),
            card(1, CardType::Quote, "핵심 인용", quote_body),
            card(
                2,
                CardType::Context,
                "상황 정리",
                format!("{}\n{}", c.context_key_line, c.core_problem),
            ),
            key_card,
            card(4, CardType::Why, "WHY IT MATTERS", c.why_important.clone()),
            card(
                5,
                CardType::Debate,
                &c.pros_cons.question,
                format!("{}\n{}", c.pros_cons.pros, c.pros_cons.cons),
            ),
            closing,
        ]
    }
}

/// Select and renumber cards for the requested deck size.
pub fn derive_variant(base: &[CardRecord], size: DeckSize) -> Vec<CardRecord> {
    let picked: Vec<CardRecord> = match size {
        DeckSize::Seven => base.to_vec(),
        DeckSize::Five => FIVE_CARD_SLOTS
            .iter()
            .filter_map(|&i| base.get(i).cloned())
            .collect(),
        DeckSize::Nine => base
            .iter()
            .cloned()
            .chain(NINE_CARD_EXTRAS.iter().filter_map(|&i| base.get(i).cloned()))
            .collect(),
    };

    picked
        .into_iter()
        .enumerate()
        .map(|(i, mut card)| {
            card.slot = i + 1;
            card
        })
        .collect()
}

/// Parse `BEFORE: x | AFTER: y | caption` into chart data.
///
/// Bars scale to the larger numeric value; non-numeric pairs get the default
/// heights.
pub fn parse_before_after(text: &str) -> BeforeAfterChart {
    let parts: Vec<&str> = text.split('|').map(str::trim).collect();

    let (before, after, caption) = if parts.len() >= 2 {
        (
            strip_tag(parts[0], "BEFORE"),
            strip_tag(parts[1], "AFTER"),
            parts.get(2..).map(|rest| rest.join(" | ")).unwrap_or_default(),
        )
    } else {
        ("이전".to_string(), "이후".to_string(), text.trim().to_string())
    };

    let (before_pct, after_pct) = match (first_number(&before), first_number(&after)) {
        (Some(b), Some(a)) if b.max(a) > 0.0 => {
            let max = b.max(a);
            (round1(b / max * 100.0), round1(a / max * 100.0))
        }
        _ => (DEFAULT_BEFORE_PCT, DEFAULT_AFTER_PCT),
    };

    BeforeAfterChart {
        before,
        after,
        caption,
        before_pct,
        after_pct,
    }
}

fn strip_tag(part: &str, tag: &str) -> String {
    let upper = part.to_ascii_uppercase();
    match upper.strip_prefix(tag) {
        Some(_) => part[tag.len()..].trim_start_matches([':', ' ']).trim().to_string(),
        None => part.to_string(),
    }
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Headline (one line) and why-it-matters, capped.
pub fn deck_summary(content: &NormalizedCardContent) -> String {
    let headline = content.headline.replace('\n', " ");
    truncate_chars(
        &format!("{headline} {}", content.why_important),
        CONTRACTS.deck_summary_max,
    )
}
