use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scorecard_cli::{Scorer, run_batch_files};
use scorecard_client::{ScorecardTransport, TransportConfig, build_transport};
use scorecard_core::report::render_table;
use scorecard_core::{Check, CheckRunner, GitHubClient, RepoRef, RunnerConfig, select_checks};

type SharedTransport = Arc<ScorecardTransport>;

#[derive(Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Security health checks for GitHub repositories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub token (reads from GITHUB_AUTH_TOKEN if not provided)
    #[arg(long, env = "GITHUB_AUTH_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "SCORECARD_API_URL", global = true)]
    api_url: Option<String>,

    /// Maximum number of checks running at once (default: unbounded)
    #[arg(long, global = true)]
    max_concurrency: Option<usize>,

    /// Attempts per check before a transient failure is final
    #[arg(long, default_value_t = 3, global = true)]
    max_attempts: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single repository and print the results
    Repo {
        /// Repository URL, e.g. https://github.com/owner/repo
        #[arg(short, long)]
        url: String,

        /// Comma-separated check names (default: all)
        #[arg(short, long, value_delimiter = ',')]
        checks: Vec<String>,
    },

    /// Score every repository listed in a CSV file
    Batch {
        /// Input CSV; the first row is a header, field 1 is the repository URL
        #[arg(short, long)]
        file: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "scorecard_output.csv")]
        output: PathBuf,

        /// Comma-separated check names (default: all)
        #[arg(short, long, value_delimiter = ',')]
        checks: Vec<String>,

        /// Write a header row to the output
        #[arg(long, default_value_t = false)]
        header: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scorecard=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = TransportConfig::from_env().context("Invalid configuration")?;
    if cli.token.is_some() {
        config.token = cli.token.clone();
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }

    let transport: SharedTransport =
        Arc::new(build_transport(&config).context("Failed to create HTTP client")?);
    let client = GitHubClient::with_base_url(transport, &config.api_url)?;
    let runner = CheckRunner::new(RunnerConfig {
        max_attempts: cli.max_attempts,
        max_concurrency: cli.max_concurrency,
    });

    match cli.command {
        Commands::Repo { url, checks } => {
            let scorer = Scorer::new(client, runner, parse_checks(&checks));
            cmd_repo(&scorer, &url).await?;
        }
        Commands::Batch {
            file,
            output,
            checks,
            header,
        } => {
            let scorer = Scorer::new(client, runner, parse_checks(&checks));
            cmd_batch(&scorer, &file, &output, header).await?;
        }
    }

    Ok(())
}

/// Resolve `--checks`; an unknown name is a usage error.
fn parse_checks(names: &[String]) -> Vec<Check<SharedTransport>> {
    match select_checks(names) {
        Ok(checks) => checks,
        Err(e) => Cli::command().error(ErrorKind::InvalidValue, e).exit(),
    }
}

async fn cmd_repo(scorer: &Scorer<SharedTransport>, url: &str) -> Result<()> {
    let repo = RepoRef::parse(url).with_context(|| format!("Invalid repository URL: {url}"))?;
    let outcomes = scorer.score(&repo).await;
    print!("{}", render_table(&outcomes));
    Ok(())
}

async fn cmd_batch(
    scorer: &Scorer<SharedTransport>,
    input: &Path,
    output: &Path,
    header: bool,
) -> Result<()> {
    tracing::info!(input = %input.display(), output = %output.display(), "Starting batch");

    match run_batch_files(scorer, input, output, header).await {
        Ok(summary) => {
            tracing::info!(
                repositories = summary.repositories,
                output = %output.display(),
                "Batch complete"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Batch stopped");
            Err(e)
        }
    }
}
