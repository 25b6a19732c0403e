//! ContentGenerationOrchestrator: ordered generation strategies ending in a
//! pure extractive fallback.
//!
//! Strategies run one at a time: every model variant of the primary
//! provider, then every variant of the secondary. Each attempt is bounded by
//! a timeout; failures are recorded and the next strategy runs. When all of
//! them fail, [`ExtractiveFallback`] builds copy from the article alone, so
//! [`ContentGenerationOrchestrator::generate`] always returns a result.

use async_trait::async_trait;
use newsdeck_config::TextGenerationConfig;
use newsdeck_core::{ArticleRecord, GenerationOptions, ProviderError, RawGenerationResult, RawProsCons, TextProvider, TextRequest};
use newsdeck_providers::{ProviderSet, TextSlot};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::category::extract_badge;
use crate::contract::CONTRACTS;
use crate::keywords::{fallback_keywords, parse_keywords};
use crate::prompt::{KEYWORD_SYSTEM_INSTRUCTION, SYSTEM_INSTRUCTION, build_keyword_prompt, build_text_prompt};
use crate::text::{char_len, collapse_whitespace, truncate_chars};

/// Models kept from a discovered listing.
const DISCOVERED_MODELS: usize = 3;

const KEYWORD_TEMPERATURE: f32 = 0.3;
const KEYWORD_MAX_TOKENS: u32 = 200;

/// Which step produced the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationSource {
    Provider { provider: String, model: String },
    Extractive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, auth, rate limit, timeout or HTTP error
    ProviderUnavailable,
    /// The provider answered with something that is not a card deck
    MalformedResponse,
}

/// One failed strategy attempt. Recorded, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptFailure {
    pub strategy: String,
    pub model: String,
    pub kind: FailureKind,
    pub error: String,
}

impl AttemptFailure {
    fn new(strategy: &str, model: &str, error: &ProviderError) -> Self {
        Self {
            strategy: strategy.to_string(),
            model: model.to_string(),
            kind: if error.is_malformed() {
                FailureKind::MalformedResponse
            } else {
                FailureKind::ProviderUnavailable
            },
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub result: RawGenerationResult,
    pub source: GenerationSource,
    pub failures: Vec<AttemptFailure>,
}

/// Tag keywords and how they were produced.
#[derive(Debug, Clone)]
pub struct KeywordOutcome {
    pub keywords: Vec<String>,
    pub source: GenerationSource,
    pub failures: Vec<AttemptFailure>,
}

/// One network-backed way of producing raw copy.
#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    fn provider(&self) -> &str;
    fn model(&self) -> &str;
    async fn attempt(&self, prompt: &str) -> Result<RawGenerationResult, ProviderError>;
}

/// A single model variant of a text provider.
pub struct ProviderStrategy {
    provider: Arc<dyn TextProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[async_trait]
impl GenerationStrategy for ProviderStrategy {
    fn provider(&self) -> &str {
        self.provider.name()
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn attempt(&self, prompt: &str) -> Result<RawGenerationResult, ProviderError> {
        let mut request = TextRequest::new(&self.model, prompt);
        request.system = Some(SYSTEM_INSTRUCTION.to_string());
        request.temperature = self.temperature;
        request.max_tokens = Some(self.max_tokens);

        let response = self.provider.complete(request).await?;
        debug!(model = %response.model, chars = response.text.len(), "Provider responded");
        parse_generation(&response.text)
    }
}

pub struct ContentGenerationOrchestrator {
    primary: Option<TextSlot>,
    secondary: Option<TextSlot>,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
    max_article_chars: usize,
    discover_models: bool,
}

impl ContentGenerationOrchestrator {
    pub fn new(providers: &ProviderSet, config: &TextGenerationConfig) -> Self {
        Self {
            primary: providers.primary.clone(),
            secondary: providers.secondary.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_article_chars: config.max_article_chars,
            discover_models: config.discover_models,
        }
    }

    /// No providers: every request goes straight to the extractive fallback.
    pub fn offline() -> Self {
        Self::new(&ProviderSet::offline(), &TextGenerationConfig::default())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produce raw copy for the article. Never fails.
    pub async fn generate(&self, article: &ArticleRecord, options: &GenerationOptions) -> GenerationOutcome {
        let mut failures = Vec::new();

        if !article.is_empty() {
            let prompt = build_text_prompt(article, options, self.max_article_chars);
            let strategies = self.strategies().await;
            let total = strategies.len();

            for (i, strategy) in strategies.iter().enumerate() {
                info!(
                    provider = %strategy.provider(),
                    model = %strategy.model(),
                    attempt = i + 1,
                    total,
                    "Generation: trying strategy"
                );

                let error = match tokio::time::timeout(self.timeout, strategy.attempt(&prompt)).await {
                    Ok(Ok(result)) => {
                        return GenerationOutcome {
                            result,
                            source: GenerationSource::Provider {
                                provider: strategy.provider().to_string(),
                                model: strategy.model().to_string(),
                            },
                            failures,
                        };
                    }
                    Ok(Err(e)) => e,
                    Err(_) => ProviderError::Timeout(format!(
                        "'{}' ({}) timed out after {}s",
                        strategy.provider(),
                        strategy.model(),
                        self.timeout.as_secs()
                    )),
                };

                warn!(
                    provider = %strategy.provider(),
                    model = %strategy.model(),
                    error = %error,
                    "Generation: strategy failed, trying next"
                );
                failures.push(AttemptFailure::new(strategy.provider(), strategy.model(), &error));
            }
        }

        info!(failed_attempts = failures.len(), "Generation: using extractive fallback");
        GenerationOutcome {
            result: ExtractiveFallback::generate(article),
            source: GenerationSource::Extractive,
            failures,
        }
    }

    /// 4–5 tag keywords for the article. Never fails.
    ///
    /// Asks the first configured model of the primary, then of the secondary
    /// provider; falls back to title tokens.
    pub async fn keywords(&self, article: &ArticleRecord) -> KeywordOutcome {
        let mut failures = Vec::new();

        if !article.is_empty() {
            let prompt = build_keyword_prompt(article);
            let attempts: Vec<(&TextSlot, &str)> = [&self.primary, &self.secondary]
                .into_iter()
                .flatten()
                .filter_map(|slot| slot.models.first().map(|model| (slot, model.as_str())))
                .collect();
            let total = attempts.len();

            for (i, (slot, model)) in attempts.into_iter().enumerate() {
                let provider = slot.provider.name();
                info!(provider = %provider, model = %model, attempt = i + 1, total, "Keywords: trying provider");

                let mut request = TextRequest::new(model, prompt.as_str());
                request.system = Some(KEYWORD_SYSTEM_INSTRUCTION.to_string());
                request.temperature = KEYWORD_TEMPERATURE;
                request.max_tokens = Some(KEYWORD_MAX_TOKENS);
                request.json_output = false;

                let result = match tokio::time::timeout(self.timeout, slot.provider.complete(request)).await {
                    Ok(Ok(response)) => parse_keywords(&response.text),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(ProviderError::Timeout(format!(
                        "'{provider}' ({model}) timed out after {}s",
                        self.timeout.as_secs()
                    ))),
                };

                match result {
                    Ok(keywords) => {
                        return KeywordOutcome {
                            keywords,
                            source: GenerationSource::Provider {
                                provider: provider.to_string(),
                                model: model.to_string(),
                            },
                            failures,
                        };
                    }
                    Err(error) => {
                        warn!(provider = %provider, model = %model, error = %error, "Keywords: provider failed, trying next");
                        failures.push(AttemptFailure::new(provider, model, &error));
                    }
                }
            }
        }

        let keywords = fallback_keywords(article);
        debug!(count = keywords.len(), "Keywords: using title fallback");
        KeywordOutcome {
            keywords,
            source: GenerationSource::Extractive,
            failures,
        }
    }

    /// Primary variants, then secondary variants, in configured order.
    async fn strategies(&self) -> Vec<ProviderStrategy> {
        let mut out = Vec::new();

        if let Some(slot) = &self.primary {
            let models = self.primary_models(slot).await;
            out.extend(models.into_iter().map(|model| self.strategy(slot, model)));
        }
        if let Some(slot) = &self.secondary {
            out.extend(slot.models.iter().cloned().map(|model| self.strategy(slot, model)));
        }
        out
    }

    fn strategy(&self, slot: &TextSlot, model: String) -> ProviderStrategy {
        ProviderStrategy {
            provider: slot.provider.clone(),
            model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Configured models, or the first few the provider lists when
    /// discovery is on and the listing succeeds.
    async fn primary_models(&self, slot: &TextSlot) -> Vec<String> {
        if !self.discover_models {
            return slot.models.clone();
        }
        match tokio::time::timeout(self.timeout, slot.provider.list_models()).await {
            Ok(Ok(models)) if !models.is_empty() => {
                let models: Vec<String> = models.into_iter().take(DISCOVERED_MODELS).collect();
                info!(provider = %slot.provider.name(), models = ?models, "Using discovered models");
                models
            }
            Ok(Ok(_)) => slot.models.clone(),
            Ok(Err(e)) => {
                warn!(provider = %slot.provider.name(), error = %e, "Model discovery failed, using configured models");
                slot.models.clone()
            }
            Err(_) => {
                warn!(provider = %slot.provider.name(), "Model discovery timed out, using configured models");
                slot.models.clone()
            }
        }
    }
}

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?。！？]\s+").expect("valid pattern"));

/// Sentences shorter than this are not quote candidates.
const MIN_SENTENCE_CHARS: usize = 6;

/// Copy built from the article alone. No I/O, cannot fail.
pub struct ExtractiveFallback;

impl ExtractiveFallback {
    pub fn generate(article: &ArticleRecord) -> RawGenerationResult {
        if article.is_empty() {
            return Self::placeholder();
        }

        let (_, title) = extract_badge(&article.title);
        let body = collapse_whitespace(&article.body_text);
        let first_sentence = SENTENCE_END
            .split(&body)
            .map(str::trim)
            .find(|s| char_len(s) >= MIN_SENTENCE_CHARS)
            .map(str::to_string);

        let lead = |n: usize| {
            let text = truncate_chars(&body, n);
            if text.is_empty() { title.clone() } else { text }
        };

        let c = &CONTRACTS;
        RawGenerationResult {
            headline: Some(if title.is_empty() { lead(20) } else { title.clone() }),
            quote: Some(first_sentence.unwrap_or_else(|| title.clone())),
            quote_speaker: None,
            quote_context: Some(truncate_chars(&title, c.quote_context.max_chars)),
            context_key_line: Some(lead(80)),
            core_problem: Some(lead(120)),
            card4_key_sentence: Some(lead(45)),
            card4_explanation: Some(lead(90)),
            before_after: Some(c.before_after.fallback.to_string()),
            why_important: Some(c.why_important.fallback.to_string()),
            pros_cons: Some(RawProsCons {
                question: Some(c.pros_cons_question.fallback.to_string()),
                pros: Some(c.pros.fallback.to_string()),
                cons: Some(c.cons.fallback.to_string()),
            }),
            reader_question: Some(c.reader_question.fallback.to_string()),
            key_fact: None,
        }
    }

    /// Generic summary for an article with no title and no body.
    fn placeholder() -> RawGenerationResult {
        RawGenerationResult {
            headline: Some("뉴스 요약".into()),
            quote: Some("기사 내용을 불러오지 못했습니다.".into()),
            quote_context: Some("기사 본문이 비어 있습니다".into()),
            context_key_line: Some("원문 기사를 확인해 주세요".into()),
            core_problem: Some("확인할 수 있는 기사 내용이 없습니다".into()),
            ..Default::default()
        }
    }
}

/// Parse provider text into a raw result.
///
/// Accepts a bare JSON object, one wrapped in code fences or prose, or an
/// array whose first element is the object. A result without a headline is
/// malformed.
pub fn parse_generation(text: &str) -> Result<RawGenerationResult, ProviderError> {
    let cleaned = strip_code_fences(text);
    let value = find_json_object(cleaned)
        .ok_or_else(|| ProviderError::MalformedResponse("no JSON object in response".into()))?;

    let raw: RawGenerationResult = serde_json::from_value(value)
        .map_err(|e| ProviderError::MalformedResponse(format!("schema mismatch: {e}")))?;

    if !raw.has_headline() {
        return Err(ProviderError::MalformedResponse("response has no headline".into()));
    }
    Ok(raw)
}

pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn find_json_object(text: &str) -> Option<Value> {
    let candidates = [
        Some(text),
        outermost(text, '{', '}'),
        outermost(text, '[', ']'),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .find_map(first_object)
}

pub(crate) fn outermost(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn first_object(value: Value) -> Option<Value> {
    match value {
        Value::Object(_) => Some(value),
        Value::Array(items) => items.into_iter().next().filter(Value::is_object),
        _ => None,
    }
}
