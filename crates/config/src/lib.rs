//! Configuration loading, validation, and management for newsdeck.
//!
//! Loads configuration from `~/.newsdeck/config.toml` with environment
//! variable overrides for credentials. Validates all settings at startup.
//!
//! Provider endpoints, model names and credentials live here, never in the
//! pipeline's logic.

use newsdeck_core::DeckSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.newsdeck/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text generation (primary + secondary provider)
    #[serde(default)]
    pub text: TextGenerationConfig,

    /// Image generation for slots without an article image
    #[serde(default)]
    pub images: ImageGenerationConfig,

    /// Deck defaults
    #[serde(default)]
    pub deck: DeckConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Which wire protocol a text provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Generative Language `generateContent`
    Gemini,
    /// OpenAI-compatible `/chat/completions`
    Openai,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Openai => "openai",
        }
    }

    /// Environment variables consulted, in order, when no key is configured.
    pub fn key_env_vars(self) -> &'static [&'static str] {
        match self {
            ProviderKind::Gemini => &["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"],
            ProviderKind::Openai => &["OPENAI_API_KEY"],
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model variants, tried in this order
    #[serde(default)]
    pub models: Vec<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("models", &self.models)
            .finish()
    }
}

impl ProviderConfig {
    pub fn gemini() -> Self {
        Self {
            kind: ProviderKind::Gemini,
            enabled: true,
            api_key: None,
            api_url: None,
            models: vec![
                "gemini-2.5-flash".into(),
                "gemini-2.0-flash".into(),
                "gemini-1.5-flash".into(),
            ],
        }
    }

    pub fn openai() -> Self {
        Self {
            kind: ProviderKind::Openai,
            enabled: true,
            api_key: None,
            api_url: None,
            models: vec!["gpt-4o-mini".into()],
        }
    }

    /// Enabled and holding a non-blank key.
    pub fn is_usable(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenerationConfig {
    /// Per-attempt timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Article body is cut to this many characters before prompting
    #[serde(default = "default_max_article_chars")]
    pub max_article_chars: usize,

    /// Replace the primary model list with the provider's own listing
    #[serde(default)]
    pub discover_models: bool,

    #[serde(default = "ProviderConfig::gemini")]
    pub primary: ProviderConfig,

    #[serde(default = "ProviderConfig::openai")]
    pub secondary: ProviderConfig,
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_max_article_chars() -> usize {
    8000
}
fn default_true() -> bool {
    true
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            primary: ProviderConfig::gemini(),
            secondary: ProviderConfig::openai(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_article_chars: default_max_article_chars(),
            discover_models: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ImageGenerationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_image_model")]
    pub model: String,

    #[serde(default = "default_image_size")]
    pub size: String,

    #[serde(default = "default_image_quality")]
    pub quality: String,

    #[serde(default = "default_image_style")]
    pub style: String,

    /// Pause between consecutive generation requests
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_image_model() -> String {
    "dall-e-3".into()
}
fn default_image_size() -> String {
    "1024x1024".into()
}
fn default_image_quality() -> String {
    "standard".into()
}
fn default_image_style() -> String {
    "natural".into()
}
fn default_delay_ms() -> u64 {
    800
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            api_url: None,
            model: default_image_model(),
            size: default_image_size(),
            quality: default_image_quality(),
            style: default_image_style(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ImageGenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerationConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("size", &self.size)
            .field("quality", &self.quality)
            .field("style", &self.style)
            .field("delay_ms", &self.delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ImageGenerationConfig {
    /// The credential, if generation is enabled and the key looks real.
    ///
    /// Absent, blank, non-`sk-` and example keys (`sk-your-openai-key`,
    /// `your_openai_key`, ...) all disable generation.
    pub fn credential(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        let key = self.api_key.as_deref()?.trim();
        let lower = key.to_ascii_lowercase();
        let example = ["your", "sk-your", "sk-proj-your"]
            .iter()
            .any(|prefix| lower.starts_with(prefix));
        if key.starts_with("sk-") && !example {
            Some(key)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Default deck length (5, 7 or 9)
    #[serde(default = "default_card_count")]
    pub card_count: u8,
}

fn default_card_count() -> u8 {
    7
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            card_count: default_card_count(),
        }
    }
}

impl DeckConfig {
    pub fn size(&self) -> DeckSize {
        DeckSize::try_from(self.card_count).unwrap_or_default()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.newsdeck/config.toml).
    ///
    /// Also checks environment variables for keys the file leaves unset:
    /// - `GEMINI_API_KEY`, then `GOOGLE_AI_API_KEY` (gemini providers)
    /// - `OPENAI_API_KEY` (openai providers and image generation)
    /// - `NEWSDECK_CARD_COUNT` (deck length)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Fill unset credentials and overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|v| !v.trim().is_empty())
        };

        for provider in [&mut self.text.primary, &mut self.text.secondary] {
            if provider.api_key.is_none() {
                provider.api_key = first_set(provider.kind.key_env_vars());
            }
        }

        if self.images.api_key.is_none() {
            self.images.api_key = first_set(ProviderKind::Openai.key_env_vars());
        }

        if let Some(count) = lookup("NEWSDECK_CARD_COUNT").and_then(|v| v.trim().parse().ok()) {
            self.deck.card_count = count;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".newsdeck")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.text.temperature) {
            return Err(ConfigError::ValidationError(
                "text.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.text.timeout_secs == 0 || self.images.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than 0".into(),
            ));
        }

        if DeckSize::try_from(self.deck.card_count).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "deck.card_count must be 5, 7 or 9 (got {})",
                self.deck.card_count
            )));
        }

        for (slot, provider) in [("primary", &self.text.primary), ("secondary", &self.text.secondary)] {
            if provider.enabled && provider.models.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "text.{slot} is enabled but lists no models"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
