//! In-memory response cache for idempotent API requests.
//!
//! Successful (`200 OK`) responses to `GET`/`HEAD` requests are kept for the
//! lifetime of the transport, keyed by method and full URL. Concurrent misses
//! for the same key are coalesced: one task performs the inner request and
//! every other task waiting on that key receives its result. Requests for
//! different keys never wait on each other.

use std::sync::Arc;

use http::{Method, StatusCode};
use moka::future::Cache;
use url::Url;

use crate::error::AppError;
use crate::models::{ApiRequest, ApiResponse};
use crate::traits::Transport;

/// Cache key: the request method plus the full URL including query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub method: Method,
    pub url: Url,
}

impl CacheKey {
    /// Returns the key for `request`, or `None` if its method is not cacheable.
    pub fn for_request(request: &ApiRequest) -> Option<Self> {
        if request.method == Method::GET || request.method == Method::HEAD {
            Some(Self {
                method: request.method.clone(),
                url: request.url.clone(),
            })
        } else {
            None
        }
    }
}

/// Why an in-flight fetch produced no cache entry.
enum Uncached {
    /// The server answered, but not with 200.
    Response(ApiResponse),
    Failed(AppError),
}

/// A [`Transport`] wrapper that memoizes successful responses.
#[derive(Clone)]
pub struct CachingTransport<T> {
    inner: T,
    entries: Cache<CacheKey, ApiResponse>,
}

impl<T: Transport> CachingTransport<T> {
    /// Wrap `inner` with an unbounded, non-expiring cache.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            entries: Cache::builder().build(),
        }
    }

    /// Number of cached responses.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    async fn fetch(&self, request: ApiRequest) -> Result<ApiResponse, Uncached> {
        let response = self
            .inner
            .round_trip(request)
            .await
            .map_err(Uncached::Failed)?;
        if response.status == StatusCode::OK {
            tracing::debug!(url = %response.url, "Caching response");
            Ok(response)
        } else {
            Err(Uncached::Response(response))
        }
    }
}

impl<T: Transport> Transport for CachingTransport<T> {
    async fn round_trip(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let Some(key) = CacheKey::for_request(&request) else {
            return self.inner.round_trip(request).await;
        };

        if let Some(hit) = self.entries.get(&key).await {
            tracing::debug!(url = %key.url, "Cache hit");
            return Ok(hit);
        }

        tracing::debug!(url = %key.url, "Cache miss");
        match self.entries.try_get_with(key, self.fetch(request)).await {
            Ok(response) => Ok(response),
            Err(uncached) => match Arc::as_ref(&uncached) {
                Uncached::Response(response) => Ok(response.clone()),
                Uncached::Failed(error) => Err(error.clone()),
            },
        }
    }
}
