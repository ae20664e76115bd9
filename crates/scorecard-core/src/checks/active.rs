//! Is the project still being worked on?

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::BoxFuture;

use super::CheckContext;
use crate::github::Commit;
use crate::models::CheckResult;
use crate::traits::Transport;

pub const NAME: &str = "Active";

const LOOKBACK_DAYS: i64 = 90;
const MIN_RECENT_COMMITS: usize = 2;

pub fn run<T: Transport>(ctx: &CheckContext<T>) -> BoxFuture<'_, CheckResult> {
    Box::pin(async move {
        match ctx.client.list_commits(&ctx.owner, &ctx.repo).await {
            Ok(commits) => evaluate(&commits, Utc::now()),
            Err(e) => CheckResult::from_error(e),
        }
    })
}

fn evaluate(commits: &[Commit], now: DateTime<Utc>) -> CheckResult {
    let cutoff = now - TimeDelta::days(LOOKBACK_DAYS);
    let recent = commits
        .iter()
        .filter_map(Commit::committed_at)
        .filter(|date| *date >= cutoff)
        .count();

    tracing::debug!(recent, lookback_days = LOOKBACK_DAYS, "Counted recent commits");

    if recent >= MIN_RECENT_COMMITS {
        CheckResult::passed(10)
    } else {
        CheckResult::failed(10)
    }
}
