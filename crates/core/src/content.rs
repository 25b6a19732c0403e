//! Card copy before and after normalization.
//!
//! [`RawGenerationResult`] is whatever one provider attempt (or the
//! extractive fallback) produced. [`NormalizedCardContent`] is the same copy
//! after every field has been forced into its contract.

use serde::{Deserialize, Serialize};

/// Unvalidated copy as returned by one generation attempt.
///
/// Field names follow the JSON schema the providers are prompted with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGenerationResult {
    pub headline: Option<String>,
    pub quote: Option<String>,
    pub quote_speaker: Option<String>,
    pub quote_context: Option<String>,
    pub context_key_line: Option<String>,
    pub core_problem: Option<String>,
    #[serde(rename = "card4KeySentence")]
    pub card4_key_sentence: Option<String>,
    #[serde(rename = "card4Explanation")]
    pub card4_explanation: Option<String>,
    pub before_after: Option<String>,
    pub why_important: Option<String>,
    pub pros_cons: Option<RawProsCons>,
    pub reader_question: Option<String>,
    pub key_fact: Option<RawKeyFact>,
}

impl RawGenerationResult {
    /// Schema match: a response without a headline is not a card deck.
    pub fn has_headline(&self) -> bool {
        self.headline.as_deref().is_some_and(|h| !h.trim().is_empty())
    }

    /// The AI-supplied facts, if any.
    pub fn facts(&self) -> &[RawFact] {
        self.key_fact
            .as_ref()
            .map(|k| k.facts.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProsCons {
    pub question: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawKeyFact {
    pub facts: Vec<RawFact>,
}

/// One AI-supplied fact, in whichever shape the model chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFact {
    /// `"label: value"`
    Text(String),
    /// `{"label": ..., "value": ...}`
    Pair { label: String, value: String },
    /// Anything else; always rejected by validation.
    Other(serde_json::Value),
}

impl RawFact {
    /// Split into `(label, value)` when the entry has that shape.
    pub fn parts(&self) -> Option<(String, String)> {
        match self {
            RawFact::Text(text) => {
                let (label, value) = text.split_once([':', '：'])?;
                Some((label.trim().to_string(), value.trim().to_string()))
            }
            RawFact::Pair { label, value } => {
                Some((label.trim().to_string(), value.trim().to_string()))
            }
            RawFact::Other(_) => None,
        }
    }
}

/// Pros/cons debate copy for the debate card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProsCons {
    pub question: String,
    pub pros: String,
    pub cons: String,
}

/// Card copy with every field inside its contract.
///
/// No field is ever missing: unmet contracts are repaired or replaced with a
/// localized fallback. `quote_speaker` is the one field allowed to be empty,
/// since inventing a speaker would be worse than naming none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCardContent {
    /// One or two lines separated by `\n`
    pub headline: String,
    pub quote: String,
    pub quote_speaker: String,
    pub quote_context: String,
    pub context_key_line: String,
    pub core_problem: String,
    #[serde(rename = "card4KeySentence")]
    pub card4_key_sentence: String,
    #[serde(rename = "card4Explanation")]
    pub card4_explanation: String,
    pub before_after: String,
    pub why_important: String,
    pub pros_cons: ProsCons,
    pub reader_question: String,
}

impl NormalizedCardContent {
    pub fn headline_lines(&self) -> impl Iterator<Item = &str> {
        self.headline.split('\n')
    }
}

/// Normalized copy fed back through normalization unchanged. No AI facts.
impl From<NormalizedCardContent> for RawGenerationResult {
    fn from(content: NormalizedCardContent) -> Self {
        Self {
            headline: Some(content.headline),
            quote: Some(content.quote),
            quote_speaker: Some(content.quote_speaker),
            quote_context: Some(content.quote_context),
            context_key_line: Some(content.context_key_line),
            core_problem: Some(content.core_problem),
            card4_key_sentence: Some(content.card4_key_sentence),
            card4_explanation: Some(content.card4_explanation),
            before_after: Some(content.before_after),
            why_important: Some(content.why_important),
            pros_cons: Some(RawProsCons {
                question: Some(content.pros_cons.question),
                pros: Some(content.pros_cons.pros),
                cons: Some(content.pros_cons.cons),
            }),
            reader_question: Some(content.reader_question),
            key_fact: None,
        }
    }
}
