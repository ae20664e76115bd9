//! Do changes land through pull requests?

use futures::future::{BoxFuture, join_all};

use super::CheckContext;
use crate::models::CheckResult;
use crate::traits::Transport;

pub const NAME: &str = "Pull-Requests";

const THRESHOLD: f64 = 0.75;

pub fn run<T: Transport>(ctx: &CheckContext<T>) -> BoxFuture<'_, CheckResult> {
    Box::pin(async move {
        let commits = match ctx.client.list_commits(&ctx.owner, &ctx.repo).await {
            Ok(commits) => commits,
            Err(e) => return CheckResult::from_error(e),
        };

        let lookups = commits
            .iter()
            .map(|c| ctx.client.commit_pulls(&ctx.owner, &ctx.repo, &c.sha));
        let mut with_pr = 0;
        for pulls in join_all(lookups).await {
            match pulls {
                Ok(pulls) if !pulls.is_empty() => with_pr += 1,
                Ok(_) => {}
                Err(e) => return CheckResult::from_error(e),
            }
        }

        tracing::debug!(with_pr, total = commits.len(), "Counted commits with pull requests");
        CheckResult::proportional(with_pr, commits.len(), THRESHOLD)
    })
}
