pub mod auth;
pub mod cache;
pub mod checks;
pub mod error;
pub mod github;
pub mod models;
pub mod rate_limit;
pub mod report;
pub mod runner;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use auth::AuthTransport;
pub use cache::CachingTransport;
pub use checks::{Check, CheckContext, all_checks, select_checks};
pub use error::AppError;
pub use github::GitHubClient;
pub use models::{ApiRequest, ApiResponse, CheckOutcome, CheckResult, RepoRef};
pub use rate_limit::{RateLimitConfig, RateLimitTransport};
pub use runner::{CheckRunner, RunnerConfig, TracingRunReporter};
pub use traits::Transport;
