//! Typed access to the handful of GitHub REST endpoints the checks need.

use chrono::{DateTime, Utc};
use http::header::ACCEPT;
use http::{HeaderName, HeaderValue, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::AppError;
use crate::models::{ApiRequest, ApiResponse};
use crate::traits::Transport;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";

const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// Number of commits fetched by [`GitHubClient::list_commits`].
pub const COMMITS_PAGE_SIZE: usize = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub committer: Option<Signature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub date: Option<DateTime<Utc>>,
}

impl Commit {
    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.commit.committer.as_ref().and_then(|c| c.date)
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub merged_at: Option<DateTime<Utc>>,
}

/// GitHub REST client over any [`Transport`] chain.
#[derive(Debug, Clone)]
pub struct GitHubClient<T> {
    transport: T,
    base_url: Url,
}

impl<T: Transport> GitHubClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
        }
    }

    /// Point the client at a different API root (GitHub Enterprise, tests).
    pub fn with_base_url(transport: T, base_url: &str) -> Result<Self, AppError> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| AppError::ConfigError(format!("Invalid API URL '{base_url}': {e}")))?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::HttpError(format!("Invalid API path '{path}': {e}")))
    }

    /// GET `path` relative to the API root; returns the response whatever its status.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, AppError> {
        let request = ApiRequest::get(self.url(path)?)
            .with_header(
                ACCEPT,
                HeaderValue::from_static("application/vnd.github+json"),
            )
            .with_header(
                HeaderName::from_static(API_VERSION_HEADER),
                HeaderValue::from_static(API_VERSION),
            );
        self.transport.round_trip(request).await
    }

    /// GET `path` and decode a successful JSON body.
    pub async fn get_json<D: DeserializeOwned>(&self, path: &str) -> Result<D, AppError> {
        let response = self.get(path).await?;
        if !response.is_success() {
            return Err(AppError::ApiError {
                status: response.status.as_u16(),
                url: response.url.to_string(),
            });
        }
        response.json()
    }

    /// The most recent commits on the default branch.
    pub async fn list_commits(&self, owner: &str, repo: &str) -> Result<Vec<Commit>, AppError> {
        self.get_json(&format!(
            "repos/{owner}/{repo}/commits?per_page={COMMITS_PAGE_SIZE}"
        ))
        .await
    }

    /// Directory listing at `path` (empty for the repository root).
    pub async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<ContentEntry>, AppError> {
        self.get_json(&format!("repos/{owner}/{repo}/contents/{path}"))
            .await
    }

    /// Whether a file exists at `path`: 200 is yes, 404 is no, anything else an error.
    pub async fn file_exists(&self, owner: &str, repo: &str, path: &str) -> Result<bool, AppError> {
        let response = self
            .get(&format!("repos/{owner}/{repo}/contents/{path}"))
            .await?;
        match response.status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(AppError::ApiError {
                status: status.as_u16(),
                url: response.url.to_string(),
            }),
        }
    }

    /// Pull requests associated with commit `sha`.
    pub async fn commit_pulls(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<PullRequest>, AppError> {
        self.get_json(&format!("repos/{owner}/{repo}/commits/{sha}/pulls"))
            .await
    }
}
