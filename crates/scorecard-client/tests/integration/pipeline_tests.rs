use std::sync::Arc;
use std::time::Duration;

use scorecard_client::{TransportConfig, build_transport};
use scorecard_core::{
    CheckContext, CheckRunner, GitHubClient, RateLimitConfig, RepoRef, RunnerConfig, all_checks,
};

use crate::common::spawn_api;

#[tokio::test]
async fn all_checks_share_one_cache() {
    let (base, hits) = spawn_api().await;
    let transport = Arc::new(
        build_transport(&TransportConfig {
            token: None,
            api_url: base.clone(),
            timeout: Duration::from_secs(10),
            rate_limit: RateLimitConfig::default(),
        })
        .unwrap(),
    );
    let client = GitHubClient::with_base_url(Arc::clone(&transport), &base).unwrap();
    let repo = RepoRef::parse("github.com/octo/widget").unwrap();
    let ctx = Arc::new(CheckContext::new(client, &repo));

    let runner = CheckRunner::new(RunnerConfig::default());
    let outcomes = runner.run(ctx, &all_checks()).await;

    let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        names,
        ["Active", "Frozen-Deps", "Pull-Requests", "Security-Policy"]
    );
    for outcome in &outcomes {
        assert!(outcome.result.pass, "{} failed: {:?}", outcome.name, outcome.result);
        assert_eq!(outcome.result.confidence, 10);
        assert_eq!(outcome.attempts, 1);
    }

    // Active and Pull-Requests both list commits; only one request leaves the process.
    assert_eq!(hits.get("/repos/octo/widget/commits?per_page=30"), 1);
    assert_eq!(hits.get("/repos/octo/widget/commits/a1/pulls"), 1);
}
