use thiserror::Error;

/// AI-layer errors.
///
/// Only `Configuration` ever reaches callers of the public operations;
/// everything else is recovered inside the providers and replaced by a
/// deterministic fallback response.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited{}", match .retry_after_ms {
        Some(ms) => format!(" (retry after {}ms)", ms),
        None => String::new(),
    })]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error ({provider}): {message}")]
    ProviderError { provider: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type AiResult<T> = Result<T, AiError>;
