//! Cache-first loading of a project's issues.

use chrono::{DateTime, Utc};
use color_eyre::Result;
use tracing::{error, info, warn};

use super::snapshot::{Snapshot, SnapshotCache};
use super::source::IssueSource;
use super::store::KeyValueStore;
use crate::jira::types::Issue;

/// Where loaded issues came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
  Cache,
  Network,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
  pub issues: Vec<Issue>,
  /// Capture time of the issues, not the time of this load
  pub fetched_at: DateTime<Utc>,
  pub source: LoadSource,
}

pub struct IssueLoader<S: KeyValueStore, F: IssueSource> {
  cache: SnapshotCache<S>,
  source: F,
  clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStore, F: IssueSource> IssueLoader<S, F> {
  pub fn new(store: S, source: F) -> Self {
    Self {
      cache: SnapshotCache::new(store),
      source,
      clock: Utc::now,
    }
  }

  #[cfg(test)]
  fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
    self.clock = clock;
    self
  }

  /// Issues from a fresh snapshot, without touching the network.
  pub fn cached(&self, project_key: &str) -> Option<LoadOutcome> {
    let snapshot = self.cache.lookup(project_key, (self.clock)())?;
    info!(%project_key, count = snapshot.issues.len(), "Using cached issues");
    Some(LoadOutcome {
      issues: snapshot.issues,
      fetched_at: snapshot.timestamp,
      source: LoadSource::Cache,
    })
  }

  /// Serve a fresh snapshot from the cache, or fetch.
  pub async fn load(&self, project_key: &str) -> Result<LoadOutcome> {
    if let Some(outcome) = self.cached(project_key) {
      return Ok(outcome);
    }

    self.fetch(project_key).await
  }

  /// Always fetch, ignoring the cache.
  pub async fn refresh(&self, project_key: &str) -> Result<LoadOutcome> {
    self.fetch(project_key).await
  }

  /// Write a fetched outcome as the project's snapshot. Call this only for
  /// the outcome that is shown, so a superseded fetch never lands in the
  /// cache. Outcomes served from the cache are not written back.
  pub fn persist(&self, project_key: &str, outcome: &LoadOutcome) {
    if outcome.source == LoadSource::Cache {
      return;
    }

    let snapshot = Snapshot {
      issues: outcome.issues.clone(),
      timestamp: outcome.fetched_at,
    };
    if let Err(e) = self.cache.store(project_key, &snapshot) {
      // The fetched issues are still good to show
      warn!(%project_key, error = %e, "Failed to cache issues");
    }
  }

  async fn fetch(&self, project_key: &str) -> Result<LoadOutcome> {
    info!(%project_key, "Fetching issues");

    let issues = match self.source.fetch_issues(project_key).await {
      Ok(issues) => issues,
      Err(e) => {
        error!(%project_key, error = %e, "Failed to fetch issues");
        return Err(e);
      }
    };

    info!(%project_key, count = issues.len(), "Fetched issues");
    Ok(LoadOutcome {
      issues,
      fetched_at: (self.clock)(),
      source: LoadSource::Network,
    })
  }
}
