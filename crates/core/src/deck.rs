//! Card records and decks handed to the renderer.

use serde::{Deserialize, Serialize};

/// Semantic role of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Cover,
    Quote,
    Context,
    KeyFact,
    Why,
    Debate,
    Closing,
}

/// Supported deck lengths. Serialized as the plain card count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeckSize {
    Five,
    #[default]
    Seven,
    Nine,
}

impl DeckSize {
    pub fn count(self) -> usize {
        match self {
            DeckSize::Five => 5,
            DeckSize::Seven => 7,
            DeckSize::Nine => 9,
        }
    }
}

impl TryFrom<u8> for DeckSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(DeckSize::Five),
            7 => Ok(DeckSize::Seven),
            9 => Ok(DeckSize::Nine),
            other => Err(format!("card count must be 5, 7 or 9 (got {other})")),
        }
    }
}

impl From<DeckSize> for u8 {
    fn from(size: DeckSize) -> Self {
        size.count() as u8
    }
}

/// Before/after comparison drawn on the key-fact card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeAfterChart {
    pub before: String,
    pub after: String,
    pub caption: String,
    /// Bar heights in percent of the larger value
    pub before_pct: f64,
    pub after_pct: f64,
}

/// One card of the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    /// 1-based position in the deck
    pub slot: usize,
    pub card_type: CardType,
    pub title: String,
    pub body: String,
    pub image: String,
    /// Call-to-action target (closing card)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<BeforeAfterChart>,
}

/// Corner tag taken from the article title, e.g. `[단독]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckBadge {
    pub tag: String,
    pub display_text: String,
}

/// An ordered, render-ready deck of 5, 7 or 9 cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDeck {
    /// Template identifier, e.g. "시사 7장"
    pub template: String,
    pub size: DeckSize,
    pub category: String,
    pub category_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<DeckBadge>,
    pub summary: String,
    pub cards: Vec<CardRecord>,
}

impl CardDeck {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, card_type: CardType) -> Option<&CardRecord> {
        self.cards.iter().find(|c| c.card_type == card_type)
    }
}
