//! The check registry.
//!
//! A check is a named async function evaluated against one repository. All
//! checks share one [`CheckContext`] (and so one transport chain) and must be
//! safe to invoke repeatedly: the runner re-runs a check from scratch when
//! it signals a transient failure.

pub mod active;
pub mod frozen_deps;
pub mod pull_requests;
pub mod security_policy;

use futures::future::BoxFuture;

use crate::error::AppError;
use crate::github::GitHubClient;
use crate::models::{CheckResult, RepoRef};
use crate::traits::Transport;

/// Everything a check needs: an API client bound to one repository.
pub struct CheckContext<T> {
    pub client: GitHubClient<T>,
    pub owner: String,
    pub repo: String,
}

impl<T: Transport> CheckContext<T> {
    pub fn new(client: GitHubClient<T>, repo: &RepoRef) -> Self {
        Self {
            client,
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
        }
    }
}

pub type CheckFn<T> = for<'a> fn(&'a CheckContext<T>) -> BoxFuture<'a, CheckResult>;

/// A named check.
pub struct Check<T> {
    pub name: &'static str,
    pub run: CheckFn<T>,
}

impl<T> Check<T> {
    pub fn new(name: &'static str, run: CheckFn<T>) -> Self {
        Self { name, run }
    }
}

impl<T> Clone for Check<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Check<T> {}

impl<T> std::fmt::Debug for Check<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

/// Every built-in check.
pub fn all_checks<T: Transport>() -> Vec<Check<T>> {
    vec![
        Check::new(active::NAME, active::run::<T>),
        Check::new(frozen_deps::NAME, frozen_deps::run::<T>),
        Check::new(pull_requests::NAME, pull_requests::run::<T>),
        Check::new(security_policy::NAME, security_policy::run::<T>),
    ]
}

/// The built-in checks named in `names` (case-insensitive), or all of them
/// when `names` is empty.
pub fn select_checks<T: Transport>(names: &[String]) -> Result<Vec<Check<T>>, AppError> {
    let all = all_checks::<T>();
    if names.is_empty() {
        return Ok(all);
    }

    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let check = all
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = all.iter().map(|c| c.name).collect();
                AppError::ConfigError(format!(
                    "Unknown check '{name}' (available: {})",
                    known.join(", ")
                ))
            })?;
        if !selected.iter().any(|c: &Check<T>| c.name == check.name) {
            selected.push(*check);
        }
    }
    Ok(selected)
}
