//! Provider construction: turns `AppConfig` into the concrete providers the
//! pipeline runs against.
//!
//! Unusable entries (disabled, or no key) are left out, so the orchestrator
//! only ever sees providers it can actually call.

use std::sync::Arc;
use newsdeck_config::{AppConfig, ProviderConfig, ProviderKind};
use newsdeck_core::provider::{ImageProvider, TextProvider};
use tracing::info;
use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::openai_images::OpenAiImageProvider;

/// A text provider with its ordered model variants.
#[derive(Clone)]
pub struct TextSlot {
    pub provider: Arc<dyn TextProvider>,
    pub models: Vec<String>,
}

/// Everything the pipeline may call, in priority order.
#[derive(Clone, Default)]
pub struct ProviderSet {
    pub primary: Option<TextSlot>,
    pub secondary: Option<TextSlot>,
    pub images: Option<Arc<dyn ImageProvider>>,
}

impl ProviderSet {
    /// No network providers at all.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Text slots in the order they are tried.
    pub fn text_slots(&self) -> impl Iterator<Item = &TextSlot> {
        self.primary.iter().chain(self.secondary.iter())
    }
}

/// Build providers from configuration.
pub fn build_from_config(config: &AppConfig) -> ProviderSet {
    let primary = build_text_slot(&config.text.primary);
    let secondary = build_text_slot(&config.text.secondary);

    let images = config.images.credential().map(|key| {
        Arc::new(OpenAiImageProvider::from_config(&config.images, key)) as Arc<dyn ImageProvider>
    });

    info!(
        primary = primary.as_ref().map(|s| s.provider.name()).unwrap_or("none"),
        secondary = secondary.as_ref().map(|s| s.provider.name()).unwrap_or("none"),
        images = images.is_some(),
        "Providers configured"
    );

    ProviderSet {
        primary,
        secondary,
        images,
    }
}

fn build_text_slot(config: &ProviderConfig) -> Option<TextSlot> {
    if !config.is_usable() || config.models.is_empty() {
        return None;
    }
    let api_key = config.api_key.clone().unwrap_or_default();

    let provider: Arc<dyn TextProvider> = match config.kind {
        ProviderKind::Gemini => {
            let mut p = GeminiProvider::new(api_key.trim());
            if let Some(url) = &config.api_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        ProviderKind::Openai => {
            let base_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| default_base_url(config.kind));
            Arc::new(OpenAiCompatProvider::new(
                config.kind.as_str(),
                base_url,
                api_key.trim(),
            ))
        }
    };

    Some(TextSlot {
        provider,
        models: config.models.clone(),
    })
}

/// Get the default base URL for a provider kind.
fn default_base_url(kind: ProviderKind) -> String {
    match kind {
        ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta".into(),
        ProviderKind::Openai => "https://api.openai.com/v1".into(),
    }
}
