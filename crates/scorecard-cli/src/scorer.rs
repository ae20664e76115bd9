use std::sync::Arc;

use scorecard_core::{
    Check, CheckContext, CheckOutcome, CheckRunner, GitHubClient, RepoRef, Transport,
};

/// Runs a fixed set of checks against one repository at a time.
///
/// Every repository gets its own [`CheckContext`], but they all share the
/// client's transport and therefore its response cache.
pub struct Scorer<T> {
    client: GitHubClient<T>,
    runner: CheckRunner,
    checks: Vec<Check<T>>,
}

impl<T: Transport + Clone + 'static> Scorer<T> {
    pub fn new(client: GitHubClient<T>, runner: CheckRunner, checks: Vec<Check<T>>) -> Self {
        Self {
            client,
            runner,
            checks,
        }
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name).collect()
    }

    pub async fn score(&self, repo: &RepoRef) -> Vec<CheckOutcome> {
        tracing::info!(%repo, checks = self.checks.len(), "Scoring repository");

        let ctx = Arc::new(CheckContext::new(self.client.clone(), repo));
        let outcomes = self.runner.run(ctx, &self.checks).await;

        let passed = outcomes.iter().filter(|o| o.result.pass).count();
        tracing::info!(%repo, passed, total = outcomes.len(), "Repository scored");
        outcomes
    }
}
