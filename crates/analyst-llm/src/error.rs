//! Error types for provider operations

use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Failures talking to an analysis provider
///
/// Every variant is terminal for the attempt; callers decide whether to ask
/// again.
#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success HTTP status without a more specific mapping
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// HTTP 401 or 403
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// HTTP 429, quota or rate limit
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// HTTP 400, the provider rejected the request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP 404 for the requested model
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Transport failure: connect, timeout, TLS or body read
    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body did not have the expected shape, or carried no candidate
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing API key or invalid client settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
