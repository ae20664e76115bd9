use std::time::Duration;

use scorecard_core::AppError;
use scorecard_core::github::DEFAULT_API_URL;
use scorecard_core::rate_limit::RateLimitConfig;

pub const TOKEN_ENV: &str = "GITHUB_AUTH_TOKEN";
pub const API_URL_ENV: &str = "SCORECARD_API_URL";
pub const TIMEOUT_ENV: &str = "SCORECARD_HTTP_TIMEOUT_SECS";
pub const RATE_LIMIT_RETRIES_ENV: &str = "SCORECARD_RATE_LIMIT_MAX_RETRIES";
pub const RATE_LIMIT_WAIT_ENV: &str = "SCORECARD_RATE_LIMIT_MAX_WAIT_SECS";

/// Configuration for the outbound transport chain.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bearer token; `None` means unauthenticated access.
    pub token: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl TransportConfig {
    /// Read configuration from environment variables.
    ///
    /// - `GITHUB_AUTH_TOKEN` (optional)
    /// - `SCORECARD_API_URL` (optional, defaults to `https://api.github.com/`)
    /// - `SCORECARD_HTTP_TIMEOUT_SECS` (optional, defaults to 30)
    /// - `SCORECARD_RATE_LIMIT_MAX_RETRIES` (optional, defaults to 5)
    /// - `SCORECARD_RATE_LIMIT_MAX_WAIT_SECS` (optional, defaults to 3600)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let token = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty());
        let api_url = lookup(API_URL_ENV)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let timeout = match parse_u64(&lookup, TIMEOUT_ENV)? {
            None => defaults.timeout,
            Some(0) => {
                return Err(AppError::ConfigError(format!(
                    "{TIMEOUT_ENV} must be at least 1"
                )));
            }
            Some(secs) => Duration::from_secs(secs),
        };

        let max_retries = match parse_u64(&lookup, RATE_LIMIT_RETRIES_ENV)? {
            None => defaults.rate_limit.max_retries,
            Some(n) => u32::try_from(n).map_err(|_| {
                AppError::ConfigError(format!("{RATE_LIMIT_RETRIES_ENV} is too large"))
            })?,
        };
        let max_wait = parse_u64(&lookup, RATE_LIMIT_WAIT_ENV)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit.max_wait);

        Ok(Self {
            token,
            api_url,
            timeout,
            rate_limit: RateLimitConfig {
                max_retries,
                max_wait,
            },
        })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, AppError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            AppError::ConfigError(format!(
                "Invalid {key} '{raw}': must be a non-negative integer"
            ))
        }),
    }
}
