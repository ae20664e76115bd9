//! Test utilities: a scriptable in-memory [`Transport`].
//!
//! Handwritten mock for dependency injection in unit tests. Uses
//! `Arc<Mutex<_>>` for interior mutability so tests can assert on the
//! requests that reached it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::header::HeaderMap;
use http::{HeaderValue, StatusCode};
use url::Url;

use crate::error::AppError;
use crate::models::{ApiRequest, ApiResponse};
use crate::traits::Transport;

/// Builds a response for `url` with the given status and body.
pub fn response(url: &str, status: u16, body: &str) -> ApiResponse {
    ApiResponse::new(
        Url::parse(url).unwrap(),
        StatusCode::from_u16(status).unwrap(),
        HeaderMap::new(),
        body.to_string(),
    )
}

/// Builds a response whose rate-limit headers report an exhausted quota.
pub fn rate_limited_response(url: &str, reset_at: i64) -> ApiResponse {
    let mut resp = response(url, 403, r#"{"message":"API rate limit exceeded"}"#);
    resp.headers
        .insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
    resp.headers.insert(
        "X-RateLimit-Reset",
        HeaderValue::from_str(&reset_at.to_string()).unwrap(),
    );
    resp
}

#[derive(Debug, Clone)]
enum Route {
    Reply { status: u16, body: String },
    Fail(AppError),
}

/// Mock transport.
///
/// Each call first pops the response queue; once it is empty the request's
/// `path?query` is looked up in the route table; anything else gets a 404.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<Vec<Result<ApiResponse, AppError>>>>,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    delay: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Result<ApiResponse, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    /// Answers every request for `path_and_query` with `status` and `body`.
    pub fn with_route(self, path_and_query: &str, status: u16, body: &str) -> Self {
        self.routes.lock().unwrap().insert(
            path_and_query.to_string(),
            Route::Reply {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Fails every request for `path_and_query` with `error`.
    pub fn with_route_error(self, path_and_query: &str, error: AppError) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), Route::Fail(error));
        self
    }

    /// Sleeps this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn route_key(url: &Url) -> String {
        match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        }
    }
}

impl Transport for MockTransport {
    async fn round_trip(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let queued = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };
        if let Some(next) = queued {
            return next;
        }

        let route = self
            .routes
            .lock()
            .unwrap()
            .get(&Self::route_key(&request.url))
            .cloned();
        match route {
            Some(Route::Reply { status, body }) => {
                Ok(response(request.url.as_str(), status, &body))
            }
            Some(Route::Fail(error)) => Err(error),
            None => Ok(response(
                request.url.as_str(),
                404,
                r#"{"message":"Not Found"}"#,
            )),
        }
    }
}
