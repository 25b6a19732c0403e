//! OpenAI image generation (`/images/generations`).
//!
//! One request, one image URL. Size, quality and style are fixed per
//! provider instance.

use async_trait::async_trait;
use newsdeck_core::error::ProviderError;
use newsdeck_core::provider::ImageProvider;
use serde::Deserialize;
use tracing::{debug, warn};

/// Prompts longer than this are cut before sending.
pub const MAX_PROMPT_CHARS: usize = 4000;

pub struct OpenAiImageProvider {
    base_url: String,
    api_key: String,
    model: String,
    size: String,
    quality: String,
    style: String,
    client: reqwest::Client,
}

impl OpenAiImageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: api_key.into(),
            model: "dall-e-3".into(),
            size: "1024x1024".into(),
            quality: "standard".into(),
            style: "natural".into(),
            client,
        }
    }

    /// Build from the image section of the config, given a usable credential.
    pub fn from_config(config: &newsdeck_config::ImageGenerationConfig, api_key: &str) -> Self {
        let mut provider = Self::new(api_key);
        if let Some(url) = &config.api_url {
            provider.base_url = url.trim_end_matches('/').to_string();
        }
        provider.model = config.model.clone();
        provider.size = config.size.clone();
        provider.quality = config.quality.clone();
        provider.style = config.style.clone();
        provider
    }

    fn to_api_body(&self, prompt: &str) -> serde_json::Value {
        let prompt: String = prompt.chars().take(MAX_PROMPT_CHARS).collect();
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": self.size,
            "quality": self.quality,
            "style": self.style,
        })
    }

    fn extract_url(response: ApiResponse) -> std::result::Result<String, ProviderError> {
        response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("No image URL in response".into()))
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    fn name(&self) -> &str {
        "openai-images"
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let url = format!("{}/images/generations", self.base_url);
        let body = self.to_api_body(prompt);

        debug!(model = %self.model, size = %self.size, "Sending image generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Image provider returned error");
            return Err(ProviderError::from_status(status, error_body));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        Self::extract_url(api_response)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    #[serde(default)]
    url: Option<String>,
}
