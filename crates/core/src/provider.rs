//! Provider traits: the abstraction over generation backends.
//!
//! A [`TextProvider`] turns a prompt into free-form text for one model
//! variant; an [`ImageProvider`] turns a prompt into one image reference.
//! Neither is trusted: the pipeline validates everything they return.
//!
//! Implementations: Gemini, OpenAI-compatible chat completions, OpenAI images.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;

/// One text-generation request against a single model variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    /// The model variant to use (e.g., "gemini-2.5-flash", "gpt-4o-mini")
    pub model: String,

    /// Optional system instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The user prompt
    pub prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Ask the backend for a JSON object response when it supports it
    #[serde(default)]
    pub json_output: bool,
}

fn default_temperature() -> f32 {
    0.7
}

impl TextRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_tokens: None,
            json_output: true,
        }
    }
}

/// The raw text a provider produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    /// Generated text, unparsed
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// A text-generation backend.
///
/// The orchestrator calls `complete()` once per model variant, one at a time,
/// without knowing which backend is behind the trait.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a request and get the complete generated text.
    async fn complete(&self, request: TextRequest) -> std::result::Result<TextResponse, ProviderError>;

    /// List models this provider can serve, in the provider's own order.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }
}

/// An image-generation backend.
///
/// Size, quality and model are fixed when the provider is built; each call
/// carries only the prompt and yields one image URL.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Generate one image and return its URL.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError>;
}
