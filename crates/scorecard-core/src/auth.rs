//! Bearer-token injection for outbound API requests.

use http::HeaderValue;
use http::header::AUTHORIZATION;

use crate::error::AppError;
use crate::models::{ApiRequest, ApiResponse};
use crate::traits::Transport;

/// A [`Transport`] wrapper that attaches `Authorization: Bearer <token>`.
///
/// Without a token every request is forwarded untouched, which leaves the
/// caller on the (much lower) unauthenticated quota.
#[derive(Debug, Clone)]
pub struct AuthTransport<T> {
    inner: T,
    authorization: Option<HeaderValue>,
}

impl<T: Transport> AuthTransport<T> {
    /// Wrap `inner`. An empty token counts as no token.
    pub fn new(inner: T, token: Option<&str>) -> Result<Self, AppError> {
        let authorization = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    AppError::ConfigError("auth token contains invalid characters".into())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        Ok(Self {
            inner,
            authorization,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }
}

impl<T: Transport> Transport for AuthTransport<T> {
    async fn round_trip(&self, mut request: ApiRequest) -> Result<ApiResponse, AppError> {
        if let Some(value) = &self.authorization {
            request.headers.insert(AUTHORIZATION, value.clone());
        }
        self.inner.round_trip(request).await
    }
}
