//! Does the project publish a security policy?

use futures::future::BoxFuture;

use super::CheckContext;
use crate::models::CheckResult;
use crate::traits::Transport;

pub const NAME: &str = "Security-Policy";

const POLICY_PATHS: &[&str] = &["SECURITY.md", ".github/SECURITY.md", "docs/SECURITY.md"];

pub fn run<T: Transport>(ctx: &CheckContext<T>) -> BoxFuture<'_, CheckResult> {
    Box::pin(async move {
        for path in POLICY_PATHS {
            match ctx.client.file_exists(&ctx.owner, &ctx.repo, path).await {
                Ok(true) => {
                    tracing::debug!(%path, "Found security policy");
                    return CheckResult::passed(10);
                }
                Ok(false) => continue,
                Err(e) => return CheckResult::from_error(e),
            }
        }
        CheckResult::failed(10)
    })
}
