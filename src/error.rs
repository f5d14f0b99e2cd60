//! Error types for the stock insights bot

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {

    // =============================
    // Upstream Failures
    // =============================

    /// Transport failure or non-success HTTP status
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Explicit `Error Message` in an otherwise successful response
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Rate limit reached for {provider}")]
    RateLimited { provider: String },

    /// Well-formed response without a usable payload
    #[error("No usable data: {0}")]
    EmptyData(String),

    #[error("Invalid symbol: {0}")]
    ValidationFailure(String),

    /// Every quote tier failed
    #[error("Quote unavailable for {symbol}")]
    QuoteUnavailable { symbol: String },

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl InsightError {
    /// True for failures caused by the transport rather than the payload
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::Http(_))
    }
}
