//! End-to-end deck pipeline for one article.

use chrono::{DateTime, Utc};
use newsdeck_config::AppConfig;
use newsdeck_core::{
    ArticleRecord, CardDeck, GenerationOptions, ImageSlotAssignment, KeyFactContent,
    NormalizedCardContent,
};
use newsdeck_providers::ProviderSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;
use crate::assembler::{DeckAssembler, DeckInputs};
use crate::category::{detect_category, extract_badge};
use crate::facts::{FactExtractionChain, FactSource};
use crate::images::{ImageAllocator, SlotFailure};
use crate::normalize::FieldNormalizer;
use crate::orchestrator::{AttemptFailure, ContentGenerationOrchestrator, GenerationSource};
use crate::prompt::build_image_prompts;

/// How the copy and images were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub source: GenerationSource,
    pub failures: Vec<AttemptFailure>,
    /// 0-based slots filled by image generation
    pub generated_images: Vec<usize>,
    pub image_failures: Vec<SlotFailure>,
    pub keyword_source: GenerationSource,
    pub keyword_failures: Vec<AttemptFailure>,
}

/// Everything the renderer needs for one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckOutput {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub normalized_content: NormalizedCardContent,
    pub key_fact: KeyFactContent,
    pub images: ImageSlotAssignment,
    pub deck: CardDeck,
    /// 1-5 tag keywords, without `#`
    pub keywords: Vec<String>,
    pub generation: GenerationReport,
}

pub struct DeckPipeline {
    orchestrator: ContentGenerationOrchestrator,
    images: ImageAllocator,
}

impl DeckPipeline {
    pub fn new(orchestrator: ContentGenerationOrchestrator, images: ImageAllocator) -> Self {
        Self {
            orchestrator,
            images,
        }
    }

    pub fn from_config(config: &AppConfig, providers: &ProviderSet) -> Self {
        let images = ImageAllocator::new(
            providers.images.clone(),
            Duration::from_millis(config.images.delay_ms),
            Duration::from_secs(config.images.timeout_secs),
        );
        Self::new(ContentGenerationOrchestrator::new(providers, &config.text), images)
    }

    /// Extractive copy and pool-filled source images only.
    pub fn offline() -> Self {
        Self::new(ContentGenerationOrchestrator::offline(), ImageAllocator::without_generation())
    }

    /// Build the deck. Always returns a complete, contract-valid output.
    pub async fn run(&self, article: &ArticleRecord, options: &GenerationOptions) -> DeckOutput {
        let request_id = Uuid::new_v4();
        let span = info_span!("deck", request_id = %request_id);
        self.run_inner(request_id, article, options).instrument(span).await
    }

    async fn run_inner(&self, request_id: Uuid, article: &ArticleRecord, options: &GenerationOptions) -> DeckOutput {
        let (badge, title) = extract_badge(&article.title);

        let outcome = self.orchestrator.generate(article, options).await;
        let keywords = self.orchestrator.keywords(article).await;
        let content = FieldNormalizer::new(&title).normalize(&outcome.result);

        let source = FactSource {
            title: &title,
            body: &article.body_text,
            core_problem: &content.core_problem,
            card4_key_sentence: &content.card4_key_sentence,
            card4_explanation: &content.card4_explanation,
        };
        let key_fact = FactExtractionChain::run(
            outcome.result.facts(),
            &source,
            (content.card4_key_sentence.as_str(), content.card4_explanation.as_str()),
        );

        let prompts = build_image_prompts(&content);
        let allocation = self.images.allocate(&article.image_candidates(), &prompts).await;

        let (category, category_label) = detect_category(article);
        let inputs = DeckInputs {
            content: &content,
            key_fact: &key_fact,
            images: &allocation.assignment,
            source_url: &article.source_url,
            category: &category,
            category_label: &category_label,
            badge: badge.as_ref(),
        };
        let deck = DeckAssembler::assemble(&inputs, options.card_count);

        info!(
            cards = deck.len(),
            source = ?outcome.source,
            facts = key_fact.facts().len(),
            placeholders = allocation.assignment.placeholder_count(),
            "Deck assembled"
        );

        DeckOutput {
            request_id,
            generated_at: Utc::now(),
            normalized_content: content,
            key_fact,
            images: allocation.assignment,
            deck,
            keywords: keywords.keywords,
            generation: GenerationReport {
                source: outcome.source,
                failures: outcome.failures,
                generated_images: allocation.generated,
                image_failures: allocation.failures,
                keyword_source: keywords.source,
                keyword_failures: keywords.failures,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdeck_core::{CardType, DeckSize, PLACEHOLDER_IMAGE};

    fn article() -> ArticleRecord {
        ArticleRecord::new(
            "[속보] 정부, 내년 예산 656조원 편성",
            "정부는 2025년 8월 내년도 예산안을 656조원 규모로 편성했다고 밝혔다. \
             총지출 증가율은 3.2%로 역대 최저 수준이다. 김민수 장관은 민생 회복에 집중하겠다고 말했다.",
        )
        .with_source_url("https://news.example/budget")
        .with_images(["https://img.example/a.jpg", "https://img.example/b.jpg"])
    }

    #[tokio::test]
    async fn offline_run_produces_complete_deck() {
        let out = DeckPipeline::offline().run(&article(), &GenerationOptions::default()).await;

        assert_eq!(out.generation.source, GenerationSource::Extractive);
        assert_eq!(out.deck.len(), 7);
        assert_eq!(out.deck.badge.as_ref().unwrap().display_text, "BREAKING");
        assert_eq!(out.deck.category, "business");
        assert_eq!(out.images.placeholder_count(), 0);
        assert_eq!(out.images.get(2), "https://img.example/a.jpg");
        assert!(out.key_fact.is_fact_list());
        assert_eq!(
            out.deck.card(CardType::Closing).unwrap().link.as_deref(),
            Some("https://news.example/budget")
        );
        assert!(out.normalized_content.headline_lines().all(|l| l.chars().count() <= 10));
    }

    #[tokio::test]
    async fn empty_article_still_yields_deck() {
        let options = GenerationOptions::default().with_card_count(DeckSize::Five);
        let out = DeckPipeline::offline().run(&ArticleRecord::default(), &options).await;

        assert_eq!(out.deck.len(), 5);
        assert_eq!(out.normalized_content.headline, "뉴스 요약");
        assert!(out.images.iter().all(|s| s == PLACEHOLDER_IMAGE));
        assert!(!out.key_fact.is_fact_list());
        assert_eq!(out.deck.category, "general");
        assert_eq!(out.keywords, vec!["뉴스"]);
    }

    #[tokio::test]
    async fn output_serializes_camel_case() {
        let out = DeckPipeline::offline().run(&article(), &GenerationOptions::default()).await;
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["requestId"].is_string());
        assert!(json["normalizedContent"]["card4KeySentence"].is_string());
        assert_eq!(json["images"].as_array().unwrap().len(), 7);
        assert_eq!(json["deck"]["cards"][0]["cardType"], "cover");
        assert_eq!(json["generation"]["source"]["kind"], "extractive");
        assert_eq!(json["keyFact"]["format"], "facts");
        assert_eq!(json["generation"]["keywordSource"]["kind"], "extractive");
        assert_eq!(json["keywords"][0], "정부");
    }
}
