//! Does the project pin its dependencies with a lock file?

use futures::future::BoxFuture;

use super::CheckContext;
use crate::github::ContentEntry;
use crate::models::CheckResult;
use crate::traits::Transport;

pub const NAME: &str = "Frozen-Deps";

const LOCK_FILES: &[&str] = &[
    "Cargo.lock",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "go.sum",
    "Gemfile.lock",
    "Pipfile.lock",
    "poetry.lock",
    "composer.lock",
    "gradle.lockfile",
];

pub fn run<T: Transport>(ctx: &CheckContext<T>) -> BoxFuture<'_, CheckResult> {
    Box::pin(async move {
        match ctx.client.list_contents(&ctx.owner, &ctx.repo, "").await {
            Ok(entries) => evaluate(&entries),
            Err(e) => CheckResult::from_error(e),
        }
    })
}

fn evaluate(entries: &[ContentEntry]) -> CheckResult {
    let lock_file = entries
        .iter()
        .find(|e| e.kind == "file" && LOCK_FILES.contains(&e.name.as_str()));

    match lock_file {
        Some(entry) => {
            tracing::debug!(file = %entry.path, "Found lock file");
            CheckResult::passed(10)
        }
        None => CheckResult::failed(10),
    }
}
