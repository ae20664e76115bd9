use thiserror::Error;

/// Application-wide error types for Scorecard.
///
/// `Clone` so that a single failed in-flight request can be handed to every
/// task that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// HTTP request could not be built, sent, or read.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The API quota stayed exhausted past the configured ceilings.
    #[error("Rate limit exceeded (resets at epoch {reset_at})")]
    RateLimitExceeded { reset_at: i64 },

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}) for {url}")]
    ApiError { status: u16, url: String },

    /// JSON deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed input record or repository URL.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Repository hosted somewhere other than github.com.
    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_)
            | AppError::Timeout(_)
            | AppError::RateLimitExceeded { .. } => true,
            AppError::ApiError { status, .. } => *status == 429 || *status >= 500,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}
