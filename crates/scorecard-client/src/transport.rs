use std::time::Duration;

use reqwest::Client;
use scorecard_core::error::AppError;
use scorecard_core::models::{ApiRequest, ApiResponse};
use scorecard_core::traits::Transport;

pub const USER_AGENT: &str = concat!("scorecard/", env!("CARGO_PKG_VERSION"));

/// Network transport using reqwest.
///
/// The innermost layer of the chain: sends the request as given and reads
/// the whole body into memory.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    fn classify(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {e}"))
        } else {
            AppError::HttpError(e.to_string())
        }
    }
}

impl Transport for ReqwestTransport {
    async fn round_trip(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let url = request.url.clone();
        tracing::debug!(method = %request.method, %url, "Sending request");

        let response = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else {
                AppError::HttpError(format!("Failed to read response body: {e}"))
            }
        })?;

        Ok(ApiResponse::new(url, status, headers, body))
    }
}
