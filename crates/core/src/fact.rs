//! Key facts shown on the key-fact card.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A short `label: value` pair.
///
/// Fields are private so an entry cannot change after it has been validated;
/// the pipeline's fact chain is the only producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactEntry {
    label: String,
    value: String,
}

impl FactEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for FactEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// What the key-fact card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum KeyFactContent {
    /// 1–5 validated facts
    Facts { facts: Vec<FactEntry> },
    /// Two-field text used when no usable facts exist
    #[serde(rename_all = "camelCase")]
    Summary {
        key_sentence: String,
        explanation: String,
    },
}

impl KeyFactContent {
    pub fn facts(&self) -> &[FactEntry] {
        match self {
            KeyFactContent::Facts { facts } => facts,
            KeyFactContent::Summary { .. } => &[],
        }
    }

    pub fn is_fact_list(&self) -> bool {
        matches!(self, KeyFactContent::Facts { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_display() {
        let fact = FactEntry::new("금액", "5조원");
        assert_eq!(fact.to_string(), "금액: 5조원");
        assert_eq!(fact.label(), "금액");
        assert_eq!(fact.value(), "5조원");
    }

    #[test]
    fn key_fact_serialization_is_tagged() {
        let facts = KeyFactContent::Facts {
            facts: vec![FactEntry::new("연도", "2025년")],
        };
        let json = serde_json::to_string(&facts).unwrap();
        assert!(json.contains(r#""format":"facts""#));

        let summary = KeyFactContent::Summary {
            key_sentence: "핵심".into(),
            explanation: "해설".into(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""format":"summary""#));
        assert!(json.contains("keySentence"));
        assert!(summary.facts().is_empty());
        assert!(!summary.is_fact_list());
    }
}
