//! Article input and per-request generation options.

use serde::{Deserialize, Serialize};
use crate::deck::DeckSize;
use crate::image::SLOT_COUNT;

/// One scraped news article. Read-only input to the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleRecord {
    pub title: String,
    pub body_text: String,
    pub source_url: String,
    pub category: String,
    /// Ordered image URLs harvested from the article page
    pub image_urls: Vec<String>,
    pub author: String,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_text: body_text.into(),
            ..Self::default()
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the image list, trimmed, deduplicated and capped to one per slot.
    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls.into_iter().map(Into::into).collect();
        self.image_urls = self.image_candidates();
        self
    }

    /// The image list as the allocator sees it: trimmed, non-empty, first
    /// occurrence wins, at most [`SLOT_COUNT`] entries.
    ///
    /// Deserialized records are not trusted to be clean already.
    pub fn image_candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(SLOT_COUNT);
        for url in &self.image_urls {
            let url = url.trim();
            if url.is_empty() || out.iter().any(|seen| seen == url) {
                continue;
            }
            out.push(url.to_string());
            if out.len() == SLOT_COUNT {
                break;
            }
        }
        out
    }

    /// No title and no body: nothing to summarize.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.body_text.trim().is_empty()
    }
}

/// How long the generated copy should read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMode {
    #[default]
    Auto,
    Short,
    Explanatory,
}

/// Register of the generated copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechStyle {
    #[default]
    Auto,
    /// News-report endings
    Report,
    /// Conversational card-news register
    CardNews,
}

/// Per-request knobs that shape the prompt and the deck size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// 0 = informational, 100 = emotional. `None` leaves tone unspecified.
    pub tone: Option<u8>,
    pub length: LengthMode,
    pub speech_style: SpeechStyle,
    pub keyword_emphasis: bool,
    pub card_count: DeckSize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            tone: None,
            length: LengthMode::Auto,
            speech_style: SpeechStyle::Auto,
            keyword_emphasis: false,
            card_count: DeckSize::Seven,
        }
    }
}

impl GenerationOptions {
    pub fn with_tone(mut self, tone: u8) -> Self {
        self.tone = Some(tone.min(100));
        self
    }

    pub fn with_card_count(mut self, size: DeckSize) -> Self {
        self.card_count = size;
        self
    }
}
