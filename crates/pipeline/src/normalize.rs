//! FieldNormalizer: forces every field of a raw generation result into its
//! contract. Never fails; the worst case is the field's fallback text.

use newsdeck_core::{NormalizedCardContent, ProsCons, RawGenerationResult};
use tracing::debug;
use crate::contract::{CONTRACTS, FieldContract};
use crate::headline::process_headline;
use crate::quote::process_quote;
use crate::text::truncate_chars;

/// Normalizes raw copy for one article.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    /// Badge-stripped article title, source of headline fallbacks
    title: String,
}

impl FieldNormalizer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn normalize(&self, raw: &RawGenerationResult) -> NormalizedCardContent {
        let c = &CONTRACTS;
        let pros_cons = raw.pros_cons.clone().unwrap_or_default();

        let core_problem = fit(raw.core_problem.as_deref(), &c.core_problem);
        let raw_core = non_blank(raw.core_problem.as_deref());

        let content = NormalizedCardContent {
            headline: process_headline(raw.headline.as_deref().unwrap_or_default(), &self.title),
            quote: process_quote(raw.quote.as_deref().unwrap_or_default()),
            quote_speaker: fit(raw.quote_speaker.as_deref(), &c.quote_speaker),
            quote_context: fit(raw.quote_context.as_deref(), &c.quote_context),
            context_key_line: fit(raw.context_key_line.as_deref(), &c.context_key_line),
            card4_key_sentence: fit(
                non_blank(raw.card4_key_sentence.as_deref()).or(raw_core),
                &c.card4_key_sentence,
            ),
            card4_explanation: fit(
                non_blank(raw.card4_explanation.as_deref()).or(raw_core),
                &c.card4_explanation,
            ),
            core_problem,
            before_after: fit(raw.before_after.as_deref(), &c.before_after),
            why_important: fit(raw.why_important.as_deref(), &c.why_important),
            pros_cons: ProsCons {
                question: fit(pros_cons.question.as_deref(), &c.pros_cons_question),
                pros: fit(pros_cons.pros.as_deref(), &c.pros),
                cons: fit(pros_cons.cons.as_deref(), &c.cons),
            },
            reader_question: fit(raw.reader_question.as_deref(), &c.reader_question),
        };

        debug!(headline = %content.headline, quote = %content.quote, "Normalized card copy");
        content
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trim and truncate; blank values get the contract's fallback.
fn fit(value: Option<&str>, contract: &FieldContract) -> String {
    let fitted = truncate_chars(value.unwrap_or_default().trim(), contract.max_chars);
    if fitted.is_empty() {
        contract.fallback.to_string()
    } else {
        fitted
    }
}
