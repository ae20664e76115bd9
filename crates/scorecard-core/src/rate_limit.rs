//! Rate-limit aware request retries.
//!
//! GitHub reports the remaining quota and the reset time on every response
//! (`X-RateLimit-Remaining` / `X-RateLimit-Reset`). When the quota is
//! exhausted, [`RateLimitTransport`] parks the calling task until the reset
//! time and then re-issues the identical request. Only the task that hit the
//! limit waits; concurrent callers are unaffected.
//!
//! Malformed or missing headers are treated as "no information": the
//! response is returned as-is.

use std::time::Duration;

use chrono::{DateTime, Utc};
use http::HeaderMap;

use crate::error::AppError;
use crate::models::{ApiRequest, ApiResponse};
use crate::traits::Transport;

pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

/// Ceilings on how long a single request may be held back.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Number of backoff-and-retry rounds before giving up.
    pub max_retries: u32,

    /// Longest single wait that will be attempted.
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            max_wait: Duration::from_secs(60 * 60),
        }
    }
}

/// Returns the reset time when `headers` report an exhausted quota.
///
/// `None` when there is quota left or when either header is absent or not
/// an integer.
pub fn exhausted_until(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let remaining = headers
        .get(REMAINING_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    if remaining > 0 {
        return None;
    }

    let reset = headers
        .get(RESET_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    DateTime::from_timestamp(reset, 0)
}

/// Time left until `reset`, or zero if it has already passed.
fn wait_until(reset: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (reset - now).to_std().unwrap_or(Duration::ZERO)
}

/// A [`Transport`] wrapper that waits out exhausted rate limits.
#[derive(Debug, Clone)]
pub struct RateLimitTransport<T> {
    inner: T,
    config: RateLimitConfig,
}

impl<T: Transport> RateLimitTransport<T> {
    pub fn new(inner: T, config: RateLimitConfig) -> Self {
        Self { inner, config }
    }
}

impl<T: Transport> Transport for RateLimitTransport<T> {
    async fn round_trip(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let mut retries = 0;

        loop {
            let response = self.inner.round_trip(request.clone()).await?;

            let Some(reset) = exhausted_until(&response.headers) else {
                return Ok(response);
            };

            let wait = wait_until(reset, Utc::now());
            if retries >= self.config.max_retries || wait > self.config.max_wait {
                tracing::warn!(
                    url = %request.url,
                    retries,
                    wait_secs = wait.as_secs(),
                    "Rate limit exceeded, giving up"
                );
                return Err(AppError::RateLimitExceeded {
                    reset_at: reset.timestamp(),
                });
            }

            retries += 1;
            tracing::warn!(
                url = %request.url,
                wait_secs = wait.as_secs(),
                attempt = retries,
                "Rate limit exceeded. Waiting to retry"
            );
            tokio::time::sleep(wait).await;
            tracing::info!(url = %request.url, "Rate limit reset. Retrying");
        }
    }
}
