use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::AppError;

/// The only repository host checks know how to talk to.
pub const GITHUB_HOST: &str = "github.com";

/// An outbound API request.
///
/// Cheap to clone, so a decorator can re-issue exactly the same request
/// after a backoff.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully-read API response.
///
/// The body is a reference-counted immutable buffer: every clone reads the
/// same bytes from the start, independently of any other clone.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            url,
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the value of a header as a string, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outcome of a single check invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub pass: bool,
    /// Certainty of the verdict, 0-10 for the built-in checks.
    pub confidence: i32,
    /// Set when the failure is transient and the check should be run again.
    pub should_retry: bool,
    pub error: Option<AppError>,
}

impl CheckResult {
    pub fn passed(confidence: i32) -> Self {
        Self {
            pass: true,
            confidence,
            should_retry: false,
            error: None,
        }
    }

    pub fn failed(confidence: i32) -> Self {
        Self {
            pass: false,
            confidence,
            should_retry: false,
            error: None,
        }
    }

    /// A failed result carrying `error`; retryable when the error is transient.
    pub fn from_error(error: AppError) -> Self {
        Self {
            pass: false,
            confidence: 0,
            should_retry: error.is_retryable(),
            error: Some(error),
        }
    }

    /// Pass/fail based on the ratio `numerator / denominator` against `threshold`.
    ///
    /// Confidence grows with the distance from the verdict's opposite: a
    /// ratio of 1.0 passes with 10, a ratio of 0.0 fails with 10.
    pub fn proportional(numerator: usize, denominator: usize, threshold: f64) -> Self {
        if denominator == 0 {
            return Self::failed(0);
        }
        let actual = numerator as f64 / denominator as f64;
        if actual >= threshold {
            Self::passed((actual * 10.0).round() as i32)
        } else {
            Self::failed(((1.0 - actual) * 10.0).round() as i32)
        }
    }
}

/// A finished check: its name, final result, and how many attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub name: String,
    pub result: CheckResult,
    pub attempts: u32,
}

/// A repository identified by host, owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parses `<scheme>://<host>/<owner>/<repo>`.
    ///
    /// The scheme may be omitted. A trailing `.git` and any path after the
    /// repository name are ignored. Hosts other than github.com are rejected
    /// with [`AppError::UnsupportedHost`].
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };

        let url = Url::parse(&with_scheme)
            .map_err(|e| AppError::InvalidInput(format!("invalid repository URL '{raw}': {e}")))?;

        let host = url
            .host_str()
            .ok_or_else(|| AppError::InvalidInput(format!("repository URL '{raw}' has no host")))?
            .to_ascii_lowercase();
        if host != GITHUB_HOST {
            return Err(AppError::UnsupportedHost(host));
        }

        let mut segments = url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty());
        let owner = segments.next();
        let repo = segments.next().map(|r| r.trim_end_matches(".git"));

        match (owner, repo) {
            (Some(owner), Some(repo)) if !repo.is_empty() => Ok(Self {
                host,
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(AppError::InvalidInput(format!(
                "repository URL '{raw}' must look like https://github.com/<owner>/<repo>"
            ))),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.repo)
    }
}
