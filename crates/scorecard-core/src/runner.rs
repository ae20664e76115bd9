use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::checks::{Check, CheckContext};
use crate::error::AppError;
use crate::models::{CheckOutcome, CheckResult};
use crate::report::sort_outcomes;
use crate::traits::Transport;

/// How checks are executed.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Total attempts per check, counting the first one.
    pub max_attempts: u32,

    /// Upper bound on checks running at once; `None` starts all immediately.
    pub max_concurrency: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_concurrency: None,
        }
    }
}

/// Events emitted by the runner for monitoring/logging.
#[derive(Debug, Clone)]
pub enum RunEvent<'a> {
    CheckStarted {
        name: &'a str,
    },
    CheckRetrying {
        name: &'a str,
        attempt: u32,
        error: Option<&'a AppError>,
    },
    CheckFinished {
        name: &'a str,
        result: &'a CheckResult,
        attempts: u32,
    },
    CheckPanicked {
        name: &'a str,
        error: &'a str,
    },
}

/// Trait for receiving runner events (decoupled logging).
pub trait RunReporter: Send + Sync {
    fn report(&self, event: RunEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunReporter;

impl RunReporter for TracingRunReporter {
    fn report(&self, event: RunEvent<'_>) {
        match event {
            RunEvent::CheckStarted { name } => {
                tracing::info!(check = %name, "Starting check");
            }
            RunEvent::CheckRetrying {
                name,
                attempt,
                error,
            } => match error {
                Some(error) => tracing::warn!(check = %name, attempt, %error, "Check will retry"),
                None => tracing::warn!(check = %name, attempt, "Check will retry"),
            },
            RunEvent::CheckFinished {
                name,
                result,
                attempts,
            } => {
                tracing::info!(
                    check = %name,
                    pass = result.pass,
                    confidence = result.confidence,
                    attempts,
                    "Finished check"
                );
            }
            RunEvent::CheckPanicked { name, error } => {
                tracing::error!(check = %name, %error, "Check panicked");
            }
        }
    }
}

/// Runs a set of checks concurrently against one repository.
pub struct CheckRunner<R = TracingRunReporter> {
    config: RunnerConfig,
    reporter: Arc<R>,
}

impl CheckRunner<TracingRunReporter> {
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_reporter(config, TracingRunReporter)
    }
}

impl<R: RunReporter + 'static> CheckRunner<R> {
    pub fn with_reporter(config: RunnerConfig, reporter: R) -> Self {
        Self {
            config,
            reporter: Arc::new(reporter),
        }
    }

    /// Run every check to completion and return the outcomes sorted by name.
    ///
    /// Each check gets its own task. A check that keeps signalling a
    /// transient failure is re-run up to `max_attempts` times in total and
    /// its last result is kept. Failures, including panics, stay confined to
    /// the check that produced them.
    pub async fn run<T: Transport + 'static>(
        &self,
        ctx: Arc<CheckContext<T>>,
        checks: &[Check<T>],
    ) -> Vec<CheckOutcome> {
        let max_attempts = self.config.max_attempts.max(1);
        let semaphore = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let mut tasks = JoinSet::new();
        let mut names = HashMap::with_capacity(checks.len());

        for &check in checks {
            let ctx = Arc::clone(&ctx);
            let reporter = Arc::clone(&self.reporter);
            let semaphore = semaphore.clone();

            let handle = tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                run_with_retries(check, &ctx, max_attempts, reporter.as_ref()).await
            });
            names.insert(handle.id(), check.name);
        }

        let mut outcomes = Vec::with_capacity(checks.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, outcome)) => outcomes.push(outcome),
                Err(e) => {
                    let name = names.get(&e.id()).copied().unwrap_or("unknown");
                    let error = e.to_string();
                    self.reporter.report(RunEvent::CheckPanicked {
                        name,
                        error: &error,
                    });
                    outcomes.push(CheckOutcome {
                        name: name.to_string(),
                        result: CheckResult::from_error(AppError::Generic(format!(
                            "check panicked: {error}"
                        ))),
                        attempts: 0,
                    });
                }
            }
        }

        sort_outcomes(&mut outcomes);
        outcomes
    }
}

async fn run_with_retries<T: Transport, R: RunReporter>(
    check: Check<T>,
    ctx: &CheckContext<T>,
    max_attempts: u32,
    reporter: &R,
) -> CheckOutcome {
    reporter.report(RunEvent::CheckStarted { name: check.name });

    let mut attempt = 1;
    loop {
        let result = (check.run)(ctx).await;

        if result.should_retry && attempt < max_attempts {
            reporter.report(RunEvent::CheckRetrying {
                name: check.name,
                attempt,
                error: result.error.as_ref(),
            });
            attempt += 1;
            continue;
        }

        reporter.report(RunEvent::CheckFinished {
            name: check.name,
            result: &result,
            attempts: attempt,
        });
        return CheckOutcome {
            name: check.name.to_string(),
            result,
            attempts: attempt,
        };
    }
}
