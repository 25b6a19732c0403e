//! Error types for the newsdeck domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Nothing in the deck pipeline is fatal: these errors are recorded at the
//! point of failure and the pipeline moves on to its next fallback step.

use thiserror::Error;

/// Failure of a single text- or image-generation attempt.
///
/// Every variant except [`ProviderError::MalformedResponse`] means the
/// provider was unavailable for this attempt. A malformed response is handled
/// identically by callers: the attempt is recorded and the next step runs.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Map an HTTP status and body to the matching error variant.
    pub fn from_status(status_code: u16, body: String) -> Self {
        match status_code {
            429 => ProviderError::RateLimited {
                retry_after_secs: 5,
            },
            401 | 403 => ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ),
            404 => ProviderError::ModelNotFound(body),
            _ => ProviderError::ApiError {
                status_code,
                message: body,
            },
        }
    }

    /// Whether the provider answered but the payload was unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProviderError::MalformedResponse(_))
    }
}
