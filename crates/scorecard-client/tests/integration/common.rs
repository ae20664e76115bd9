use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;

/// Request counts keyed by `path?query`.
#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<HashMap<String, usize>>>);

impl Hits {
    pub fn get(&self, path_and_query: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .get(path_and_query)
            .copied()
            .unwrap_or(0)
    }
}

async fn count_hits(State(hits): State<Hits>, req: Request, next: Next) -> Response {
    let key = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    *hits.0.lock().unwrap().entry(key).or_default() += 1;
    next.run(req).await
}

async fn echo_auth(headers: HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string()
}

fn commits_json() -> String {
    let now = chrono::Utc::now();
    serde_json::json!([
        {"sha": "a1", "commit": {"committer": {"date": (now - chrono::TimeDelta::days(1)).to_rfc3339()}}},
        {"sha": "b2", "commit": {"committer": {"date": (now - chrono::TimeDelta::days(3)).to_rfc3339()}}},
        {"sha": "c3", "commit": {"committer": {"date": (now - chrono::TimeDelta::days(9)).to_rfc3339()}}},
        {"sha": "d4", "commit": {"committer": {"date": (now - chrono::TimeDelta::days(20)).to_rfc3339()}}}
    ])
    .to_string()
}

/// Routes emulating the parts of the GitHub API the checks use, plus a few
/// transport probes.
fn router(hits: Hits) -> Router {
    let limited_once = Arc::new(AtomicBool::new(false));

    Router::new()
        .route("/echo-auth", get(echo_auth))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#) }),
        )
        .route(
            "/odd-headers",
            get(|| async {
                (
                    StatusCode::OK,
                    [("x-ratelimit-remaining", "plenty"), ("x-ratelimit-reset", "later")],
                    "odd",
                )
            }),
        )
        .route(
            "/limited",
            get(move || {
                let limited_once = Arc::clone(&limited_once);
                async move {
                    if limited_once.swap(true, Ordering::SeqCst) {
                        (
                            StatusCode::OK,
                            [
                                ("x-ratelimit-remaining", "4999".to_string()),
                                ("x-ratelimit-reset", "0".to_string()),
                            ],
                            "after reset",
                        )
                            .into_response()
                    } else {
                        let reset = chrono::Utc::now().timestamp() + 2;
                        (
                            StatusCode::FORBIDDEN,
                            [
                                ("x-ratelimit-remaining", "0".to_string()),
                                ("x-ratelimit-reset", reset.to_string()),
                            ],
                            "rate limited",
                        )
                            .into_response()
                    }
                }
            }),
        )
        .route(
            "/repos/octo/widget/commits",
            get(|| async { ([("content-type", "application/json")], commits_json()) }),
        )
        .route(
            "/repos/octo/widget/contents/",
            get(|| async {
                (
                    [("content-type", "application/json")],
                    r#"[{"name":"Cargo.toml","path":"Cargo.toml","type":"file"},
                        {"name":"Cargo.lock","path":"Cargo.lock","type":"file"}]"#,
                )
            }),
        )
        .route(
            "/repos/octo/widget/contents/SECURITY.md",
            get(|| async { (StatusCode::NOT_FOUND, "{}") }),
        )
        .route(
            "/repos/octo/widget/contents/.github/SECURITY.md",
            get(|| async { (StatusCode::OK, r#"{"name":"SECURITY.md"}"#) }),
        )
        .route(
            "/repos/octo/widget/commits/{sha}/pulls",
            get(|| async { r#"[{"number":1,"merged_at":null}]"# }),
        )
        .layer(middleware::from_fn_with_state(hits, count_hits))
}

/// Start the fake API on an ephemeral port; returns its base URL and hit counter.
pub async fn spawn_api() -> (String, Hits) {
    let hits = Hits::default();
    let app = router(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/"), hits)
}
