//! Field contracts: one table of length limits and fallbacks shared by the
//! normalizer, the fact chain, the prompt builder and the tests.

use regex_lite::Regex;
use std::sync::LazyLock;

static SENTENCE_ENDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:다|요|죠|니다|습니다|했다|됐다|이다)\.?$|[.!?。]$").expect("valid pattern")
});

/// How a field's last word may end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceFinal {
    /// Terminal punctuation is appended when missing
    Required,
    /// A sentence-final ending disqualifies the value
    Forbidden,
    Any,
}

impl SentenceFinal {
    /// Whether `text` satisfies this rule.
    pub fn accepts(self, text: &str) -> bool {
        match self {
            SentenceFinal::Required => has_terminal_punctuation(text),
            SentenceFinal::Forbidden => !SENTENCE_ENDING.is_match(text),
            SentenceFinal::Any => true,
        }
    }
}

pub(crate) fn has_terminal_punctuation(text: &str) -> bool {
    text.ends_with(['.', '!', '?', '。'])
}

#[derive(Debug, Clone, Copy)]
pub struct FieldContract {
    pub name: &'static str,
    pub max_chars: usize,
    pub max_words: Option<usize>,
    pub sentence_final: SentenceFinal,
    /// Substituted when the value is missing or unrepairable. Empty means
    /// the field may stay empty.
    pub fallback: &'static str,
}

impl FieldContract {
    /// Whether the value's ending satisfies the field's sentence rule.
    pub fn accepts_ending(&self, text: &str) -> bool {
        self.sentence_final.accepts(text)
    }

    const fn text(name: &'static str, max_chars: usize, fallback: &'static str) -> Self {
        Self {
            name,
            max_chars,
            max_words: None,
            sentence_final: SentenceFinal::Any,
            fallback,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldContracts {
    /// Per line; at most `headline_max_lines` lines
    pub headline_line: FieldContract,
    pub headline_max_lines: usize,
    pub headline_min_chars: usize,
    pub quote: FieldContract,
    pub quote_speaker: FieldContract,
    pub quote_context: FieldContract,
    pub context_key_line: FieldContract,
    pub core_problem: FieldContract,
    pub card4_key_sentence: FieldContract,
    pub card4_explanation: FieldContract,
    pub before_after: FieldContract,
    pub why_important: FieldContract,
    pub pros_cons_question: FieldContract,
    pub pros: FieldContract,
    pub cons: FieldContract,
    pub reader_question: FieldContract,
    pub fact_label_min: usize,
    pub fact_label_max: usize,
    pub fact_value: FieldContract,
    pub max_facts: usize,
    pub deck_summary_max: usize,
}

pub const CONTRACTS: FieldContracts = FieldContracts {
    // Line endings are governed by the suffix strip table
    headline_line: FieldContract {
        name: "headline",
        max_chars: 10,
        max_words: None,
        sentence_final: SentenceFinal::Any,
        fallback: "핵심 이슈",
    },
    headline_max_lines: 2,
    headline_min_chars: 2,
    quote: FieldContract {
        name: "quote",
        max_chars: 30,
        max_words: None,
        sentence_final: SentenceFinal::Required,
        fallback: "핵심 내용을 확인하세요.",
    },
    quote_speaker: FieldContract::text("quoteSpeaker", 30, ""),
    quote_context: FieldContract::text("quoteContext", 60, "기사 속 발언의 배경을 확인하세요"),
    context_key_line: FieldContract::text("contextKeyLine", 80, "지금 벌어지고 있는 상황을 정리합니다"),
    core_problem: FieldContract::text("coreProblem", 60, "기사 내용을 확인하세요"),
    card4_key_sentence: FieldContract::text(
        "card4KeySentence",
        45,
        "기사에서 드러나는 문제를 요약합니다.",
    ),
    card4_explanation: FieldContract::text(
        "card4Explanation",
        90,
        "상세한 설명은 기사를 참조하세요.",
    ),
    before_after: FieldContract::text(
        "beforeAfter",
        80,
        "BEFORE: 이전 | AFTER: 이후 | 변화 정보를 확인하세요",
    ),
    why_important: FieldContract::text("whyImportant", 120, "상세 내용은 기사를 참조하세요"),
    pros_cons_question: FieldContract::text("prosCons.question", 20, "이 주제의 장단점은?"),
    pros: FieldContract::text("prosCons.pros", 20, "긍정적 관점"),
    cons: FieldContract::text("prosCons.cons", 28, "대조되는 관점"),
    reader_question: FieldContract::text("readerQuestion", 60, "당신의 생각은 어떠신가요?"),
    fact_label_min: 2,
    fact_label_max: 8,
    fact_value: FieldContract {
        name: "keyFact.value",
        max_chars: 24,
        max_words: Some(7),
        sentence_final: SentenceFinal::Forbidden,
        fallback: "",
    },
    max_facts: 5,
    deck_summary_max: 200,
};
