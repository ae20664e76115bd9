use std::fs;
use std::path::Path;

use scorecard_cli::{Scorer, run_batch, run_batch_files};
use scorecard_core::testutil::MockTransport;
use scorecard_core::{AppError, CheckRunner, GitHubClient, RunnerConfig, select_checks};
use tempfile::TempDir;

const LOCKFILE_LISTING: &str = r#"[{"name":"Cargo.lock","path":"Cargo.lock","type":"file"}]"#;

fn mock_api() -> MockTransport {
    MockTransport::new()
        .with_route("/repos/octo/widget/contents/", 200, LOCKFILE_LISTING)
        .with_route("/repos/octo/widget/contents/SECURITY.md", 200, "{}")
        .with_route("/repos/acme/tool/contents/", 200, "[]")
}

fn scorer(mock: &MockTransport) -> Scorer<MockTransport> {
    // Deliberately listed out of order.
    let names = vec!["Security-Policy".to_string(), "Frozen-Deps".to_string()];
    Scorer::new(
        GitHubClient::new(mock.clone()),
        CheckRunner::new(RunnerConfig::default()),
        select_checks(&names).unwrap(),
    )
}

fn write_input(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("repos.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn writes_one_row_per_repository_in_check_name_order() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "name,repo_url\n\
         widget,https://github.com/octo/widget\n\
         tool,https://github.com/acme/tool.git\n",
    );
    let output = dir.path().join("out.csv");
    let mock = mock_api();

    let summary = run_batch_files(&scorer(&mock), &input, &output, false)
        .await
        .unwrap();

    assert_eq!(summary.repositories, 2);
    assert_eq!(
        read_lines(&output),
        [
            "widget,https://github.com/octo/widget,true,10,true,10",
            "tool,https://github.com/acme/tool.git,false,10,false,10",
        ]
    );
}

#[tokio::test]
async fn header_row_names_identity_and_check_columns() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "name,repo_url\nwidget,github.com/octo/widget\n");
    let output = dir.path().join("out.csv");
    let mock = mock_api();

    run_batch_files(&scorer(&mock), &input, &output, true)
        .await
        .unwrap();

    let lines = read_lines(&output);
    assert_eq!(
        lines[0],
        "name,repo_url,Frozen-Deps_Pass,Frozen-Deps_Confidence,\
         Security-Policy_Pass,Security-Policy_Confidence"
    );
    assert_eq!(lines[1], "widget,github.com/octo/widget,true,10,true,10");
}

#[tokio::test]
async fn unsupported_host_stops_the_batch() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "name,repo_url\n\
         widget,https://github.com/octo/widget\n\
         mirror,https://gitlab.com/octo/widget\n\
         tool,https://github.com/acme/tool\n",
    );
    let output = dir.path().join("out.csv");
    let mock = mock_api();

    let err = run_batch_files(&scorer(&mock), &input, &output, false)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::UnsupportedHost(host)) if host == "gitlab.com"
    ));
    // Rows before the failure are kept; nothing after it is scored.
    assert_eq!(
        read_lines(&output),
        ["widget,https://github.com/octo/widget,true,10,true,10"]
    );
    assert!(
        mock.requests()
            .iter()
            .all(|r| !r.url.path().starts_with("/repos/acme"))
    );
}

#[tokio::test]
async fn row_without_url_is_rejected() {
    let mock = mock_api();
    let mut output = Vec::new();

    let err = run_batch(
        &scorer(&mock),
        "name,repo_url\nlonely\n".as_bytes(),
        &mut output,
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::InvalidInput(_))
    ));
    assert!(output.is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn header_only_input_scores_nothing() {
    let mock = mock_api();
    let mut output = Vec::new();

    let summary = run_batch(&scorer(&mock), "name,repo_url\n".as_bytes(), &mut output, false)
        .await
        .unwrap();

    assert_eq!(summary.repositories, 0);
    assert!(output.is_empty());
}

#[tokio::test]
async fn missing_input_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let mock = mock_api();

    let err = run_batch_files(
        &scorer(&mock),
        &dir.path().join("absent.csv"),
        &dir.path().join("out.csv"),
        false,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Failed to open input file"));
}
