//! End-to-end tests for the deck pipeline.
//!
//! These run the full flow (generation chain, normalization, facts, image
//! allocation, assembly) against scripted providers, no network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use newsdeck_config::AppConfig;
use newsdeck_core::{
    ArticleRecord, CardType, DeckSize, GenerationOptions, ImageProvider, KeyFactContent,
    PLACEHOLDER_IMAGE, ProviderError, TextProvider, TextRequest, TextResponse,
};
use newsdeck_pipeline::{
    ContentGenerationOrchestrator, DeckPipeline, GenerationSource, ImageAllocator,
};
use newsdeck_pipeline::orchestrator::FailureKind;
use newsdeck_providers::{ProviderSet, TextSlot};

// ── Mock Providers ───────────────────────────────────────────────────────

/// Replies from a script in order; records the model of every call.
/// Keyword requests are answered from `keyword_reply` and logged apart.
struct ScriptedText {
    name: &'static str,
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    keyword_reply: Option<String>,
    calls: Mutex<Vec<String>>,
    keyword_calls: Mutex<Vec<String>>,
}

impl ScriptedText {
    fn new(name: &'static str, replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            name,
            replies: Mutex::new(replies.into()),
            keyword_reply: None,
            calls: Mutex::new(Vec::new()),
            keyword_calls: Mutex::new(Vec::new()),
        }
    }

    fn with_keywords(mut self, reply: &str) -> Self {
        self.keyword_reply = Some(reply.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn keyword_calls(&self) -> Vec<String> {
        self.keyword_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for ScriptedText {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(&self, request: TextRequest) -> Result<TextResponse, ProviderError> {
        if request.prompt.contains("해시태그") {
            self.keyword_calls.lock().unwrap().push(request.model.clone());
            let text = self
                .keyword_reply
                .clone()
                .ok_or_else(|| ProviderError::Network("no keyword reply".into()))?;
            return Ok(TextResponse {
                text,
                model: request.model,
            });
        }

        assert!(request.prompt.contains("keyFact"), "prompt must request key facts");
        self.calls.lock().unwrap().push(request.model.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("no scripted reply".into())));
        reply.map(|text| TextResponse {
            text,
            model: request.model,
        })
    }
}

/// Never answers.
struct HangingText;

#[async_trait]
impl TextProvider for HangingText {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _request: TextRequest) -> Result<TextResponse, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ProviderError::Network("unreachable".into()))
    }
}

/// Numbered image URLs; counts calls.
struct CountingImages {
    calls: Mutex<usize>,
}

impl CountingImages {
    fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ImageProvider for CountingImages {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        assert!(prompt.chars().count() <= 4000);
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(format!("https://gen.example/{}.png", *calls))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

const FULL_RESPONSE: &str = r#"```json
{
  "headline": "정부 예산안\n국회 통과 논란",
  "quote": "“민생 회복이 무엇보다 최우선이라고 밝혔다”",
  "quoteSpeaker": "김민수 기획재정부 장관",
  "quoteContext": "국회 예산결산특별위원회 답변에서",
  "contextKeyLine": "정부가 내년도 예산안을 국회에 제출했다",
  "coreProblem": "세수 감소 속 지출 구조조정 범위를 두고 여야가 맞선다",
  "card4KeySentence": "",
  "beforeAfter": "BEFORE: 638조원 | AFTER: 656조원 | 총지출 증가",
  "whyImportant": "청년과 소상공인 지원 사업 규모가 달라진다",
  "prosCons": {"question": "긴축 예산, 필요한가?", "pros": "재정 건전성 회복", "cons": "복지 축소 우려"},
  "readerQuestion": "여러분은 이번 예산안을 어떻게 보시나요?",
  "keyFact": {"facts": [
    "총지출: 656조원",
    {"label": "증가율", "value": "2.8%"},
    "발표: 2025년 8월",
    "지지율: 140%",
    "설명: 예산안이 국회에 제출됐다"
  ]}
}
```"#;

fn article() -> ArticleRecord {
    ArticleRecord::new(
        "[단독] 정부 내년 예산 656조원 편성",
        "정부는 내년도 예산안을 656조원 규모로 편성했다. 총지출 증가율은 2.8%다. \
         김민수 장관은 민생 회복에 집중하겠다고 말했다.",
    )
    .with_source_url("https://news.example/budget")
    .with_category("politics")
    .with_images(["https://img.example/cover.jpg"])
}

fn text_slot(provider: Arc<dyn TextProvider>, models: &[&str]) -> TextSlot {
    TextSlot {
        provider,
        models: models.iter().map(|m| m.to_string()).collect(),
    }
}

fn pipeline(providers: ProviderSet, timeout: Duration) -> DeckPipeline {
    let mut config = AppConfig::default();
    config.images.delay_ms = 800;
    let orchestrator =
        ContentGenerationOrchestrator::new(&providers, &config.text).with_timeout(timeout);
    let images = ImageAllocator::new(
        providers.images.clone(),
        Duration::from_millis(config.images.delay_ms),
        Duration::from_secs(config.images.timeout_secs),
    );
    DeckPipeline::new(orchestrator, images)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_secondary_provider_after_primary_failures() {
    let primary = Arc::new(ScriptedText::new(
        "gemini",
        vec![
            Err(ProviderError::RateLimited { retry_after_secs: 5 }),
            Ok("I cannot help with that.".into()),
        ],
    ));
    let secondary = Arc::new(
        ScriptedText::new("openai", vec![Ok(FULL_RESPONSE.into())])
            .with_keywords(r#"["예산안", "국회", "민생"]"#),
    );
    let images = Arc::new(CountingImages::new());

    let providers = ProviderSet {
        primary: Some(text_slot(primary.clone(), &["gemini-2.5-flash", "gemini-2.0-flash"])),
        secondary: Some(text_slot(secondary.clone(), &["gpt-4o-mini"])),
        images: Some(images.clone() as Arc<dyn ImageProvider>),
    };

    let start = tokio::time::Instant::now();
    let out = pipeline(providers, Duration::from_secs(60))
        .run(&article(), &GenerationOptions::default())
        .await;

    // Generation chain
    assert_eq!(primary.calls(), vec!["gemini-2.5-flash", "gemini-2.0-flash"]);
    assert_eq!(secondary.calls(), vec!["gpt-4o-mini"]);
    assert_eq!(
        out.generation.source,
        GenerationSource::Provider {
            provider: "openai".into(),
            model: "gpt-4o-mini".into()
        }
    );
    assert_eq!(out.generation.failures.len(), 2);
    assert_eq!(out.generation.failures[1].kind, FailureKind::MalformedResponse);

    // Keywords: first model of each provider, one attempt each
    assert_eq!(primary.keyword_calls(), vec!["gemini-2.5-flash"]);
    assert_eq!(secondary.keyword_calls(), vec!["gpt-4o-mini"]);
    assert_eq!(out.keywords, vec!["예산안", "국회", "민생"]);
    assert_eq!(out.generation.keyword_failures.len(), 1);
    assert!(matches!(
        out.generation.keyword_source,
        GenerationSource::Provider { ref provider, .. } if provider == "openai"
    ));

    // Normalization
    let content = &out.normalized_content;
    assert_eq!(content.headline, "정부 예산안\n국회 통과 논란");
    assert_eq!(content.quote, "민생 회복이 무엇보다 최우선이.");
    assert_eq!(content.quote_speaker, "김민수 기획재정부 장관");
    assert_eq!(content.card4_key_sentence, "세수 감소 속 지출 구조조정 범위를 두고 여야가 맞선다");
    assert_eq!(content.pros_cons.cons, "복지 축소 우려");

    // Facts: three valid AI facts, the rest rejected, no extraction needed
    let rendered: Vec<String> = out.key_fact.facts().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["총지출: 656조원", "증가율: 2.8%", "발표: 2025년 8월"]);

    // Images: cover kept, six generated one at a time
    assert_eq!(images.calls(), 6);
    assert_eq!(out.images.get(0), "https://img.example/cover.jpg");
    assert_eq!(out.images.placeholder_count(), 0);
    assert_eq!(out.generation.generated_images, vec![1, 2, 3, 4, 5, 6]);
    assert!(start.elapsed() >= Duration::from_millis(5 * 800));

    // Deck
    assert_eq!(out.deck.len(), 7);
    assert_eq!(out.deck.badge.as_ref().unwrap().display_text, "EXCLUSIVE");
    assert_eq!(out.deck.category_label, "정치/시사");
    let key_card = out.deck.card(CardType::KeyFact).unwrap();
    assert_eq!(key_card.title, "핵심 팩트");
    let chart = key_card.chart.as_ref().unwrap();
    assert_eq!((chart.before.as_str(), chart.after.as_str()), ("638조원", "656조원"));
    assert_eq!(chart.after_pct, 100.0);
}

#[tokio::test]
async fn e2e_total_failure_without_images_is_all_placeholder() {
    let primary = Arc::new(ScriptedText::new(
        "gemini",
        vec![Err(ProviderError::AuthenticationFailed("bad key".into()))],
    ));
    let providers = ProviderSet {
        primary: Some(text_slot(primary, &["gemini-2.5-flash"])),
        secondary: None,
        images: None,
    };
    let article = ArticleRecord::new(
        "연말 국회 일정 논의",
        "여야 원내대표가 만나 연말 국회 일정을 논의했다. 구체적인 결론은 나오지 않았다.",
    );

    let out = pipeline(providers, Duration::from_secs(60))
        .run(&article, &GenerationOptions::default())
        .await;

    assert_eq!(out.generation.source, GenerationSource::Extractive);
    assert_eq!(out.generation.failures.len(), 1);
    assert_eq!(out.images.len(), 7);
    assert!(out.images.iter().all(|s| s == PLACEHOLDER_IMAGE));
    assert!(out.deck.cards.iter().all(|c| c.image == PLACEHOLDER_IMAGE));
    assert_eq!(out.normalized_content.quote, "여야 원내대표가 만나 연말 국회 일정을 논의했다.");
    assert_eq!(out.keywords, vec!["연말", "국회", "일정", "논의"]);
    assert_eq!(out.generation.keyword_source, GenerationSource::Extractive);
}

#[tokio::test]
async fn e2e_two_ai_facts_and_nothing_extractable_uses_summary_card() {
    let reply = r#"{
        "headline": "청년 지원\n논쟁 가열",
        "card4KeySentence": "청년 지원 방식을 두고 이견이 크다",
        "card4Explanation": "현금 지원과 일자리 지원 중 무엇이 나은지 논쟁이 이어진다",
        "keyFact": {"facts": ["쟁점: 지원 방식", "대상: 청년층"]}
    }"#;
    let primary = Arc::new(ScriptedText::new("gemini", vec![Ok(reply.into())]));
    let providers = ProviderSet {
        primary: Some(text_slot(primary, &["gemini-2.5-flash"])),
        ..Default::default()
    };
    let article = ArticleRecord::new("청년 지원 논쟁", "청년 지원 방식을 두고 논쟁이 이어지고 있다");

    let out = pipeline(providers, Duration::from_secs(60))
        .run(&article, &GenerationOptions::default())
        .await;

    assert_eq!(
        out.key_fact,
        KeyFactContent::Summary {
            key_sentence: "청년 지원 방식을 두고 이견이 크다".into(),
            explanation: "현금 지원과 일자리 지원 중 무엇이 나은지 논쟁이 이어진다".into(),
        }
    );
    let card = out.deck.card(CardType::KeyFact).unwrap();
    assert_eq!(card.title, "문제점 요약");
}

#[tokio::test(start_paused = true)]
async fn e2e_hanging_primary_times_out_then_secondary() {
    let secondary = Arc::new(ScriptedText::new("openai", vec![Ok(FULL_RESPONSE.into())]));
    let providers = ProviderSet {
        primary: Some(text_slot(Arc::new(HangingText), &["m1", "m2"])),
        secondary: Some(text_slot(secondary, &["gpt-4o-mini"])),
        images: None,
    };

    let out = pipeline(providers, Duration::from_secs(10))
        .run(&article(), &GenerationOptions::default())
        .await;

    assert_eq!(out.generation.failures.len(), 2);
    assert!(out.generation.failures.iter().all(|f| f.kind == FailureKind::ProviderUnavailable));
    assert!(matches!(out.generation.source, GenerationSource::Provider { .. }));
    // Keyword requests also time out: hanging primary, then secondary without a reply
    assert_eq!(out.generation.keyword_failures.len(), 2);
    assert_eq!(out.keywords, vec!["정부", "내년", "예산", "656조원", "편성"]);
    // One article image, reused everywhere
    assert!(out.images.iter().all(|s| s == "https://img.example/cover.jpg"));
}

#[tokio::test]
async fn e2e_deck_sizes_renumber() {
    for (size, expected) in [(DeckSize::Five, 5), (DeckSize::Seven, 7), (DeckSize::Nine, 9)] {
        let options = GenerationOptions::default().with_card_count(size);
        let out = DeckPipeline::offline().run(&article(), &options).await;
        let slots: Vec<usize> = out.deck.cards.iter().map(|c| c.slot).collect();
        assert_eq!(slots, (1..=expected).collect::<Vec<_>>());
        assert_eq!(out.deck.template, format!("시사 {expected}장"));
    }
}

#[tokio::test]
async fn e2e_concurrent_requests_are_independent() {
    let pipeline = DeckPipeline::offline();
    let a = article();
    let b = ArticleRecord::new("축구 대표팀 월드컵 본선 진출", "대표팀이 월드컵 본선 진출을 확정했다. 감독은 선수들을 칭찬했다.");

    let options = GenerationOptions::default();

    let (out_a, out_b) = tokio::join!(pipeline.run(&a, &options), pipeline.run(&b, &options));

    assert_ne!(out_a.request_id, out_b.request_id);
    assert_eq!(out_a.deck.category, "politics");
    assert_eq!(out_b.deck.category, "sports");
}

#[tokio::test]
async fn e2e_output_is_json_serializable() {
    let out = DeckPipeline::offline().run(&article(), &GenerationOptions::default()).await;
    let json = serde_json::to_string(&out).unwrap();
    assert!(json.contains("\"normalizedContent\""));
    assert!(json.contains("\"deck\""));
    assert!(json.contains("\"images\""));
    assert!(json.contains("\"keywords\""));
}
