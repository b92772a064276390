use chrono::{DateTime, Utc};
use tracing::warn;

use super::filters::{FilterField, FilterOptions, FilterSelection};
use super::loader::LoadOutcome;
use crate::jira::types::Issue;

/// Lifecycle of the card. Failures don't have a phase of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
  Uninitialized,
  Loading,
  Loaded,
}

/// In-memory state of the issue card for one project
#[derive(Debug, Clone)]
pub struct IssueCard {
  project_key: String,
  phase: CardPhase,
  issues: Vec<Issue>,
  fetched_at: Option<DateTime<Utc>>,
  filters: FilterSelection,
  options: FilterOptions,
}

impl IssueCard {
  pub fn new(project_key: String) -> Self {
    Self {
      project_key,
      phase: CardPhase::Uninitialized,
      issues: Vec::new(),
      fetched_at: None,
      filters: FilterSelection::default(),
      options: FilterOptions::default(),
    }
  }

  pub fn project_key(&self) -> &str {
    &self.project_key
  }

  pub fn phase(&self) -> CardPhase {
    self.phase
  }

  pub fn is_loading(&self) -> bool {
    self.phase == CardPhase::Loading
  }

  pub fn begin_loading(&mut self) {
    self.phase = CardPhase::Loading;
  }

  /// Take over loaded issues. Vocabularies are rederived.
  pub fn apply(&mut self, outcome: LoadOutcome) {
    self.options = FilterOptions::derive(&outcome.issues);
    self.issues = outcome.issues;
    self.fetched_at = Some(outcome.fetched_at);
    self.phase = CardPhase::Loaded;
  }

  /// A load failed: keep whatever was shown before.
  pub fn fail(&mut self, error: &str) {
    warn!(project_key = %self.project_key, %error, "Keeping previous issues");
    self.phase = CardPhase::Loaded;
  }

  pub fn issues(&self) -> &[Issue] {
    &self.issues
  }

  pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
    self.fetched_at
  }

  pub fn filters(&self) -> &FilterSelection {
    &self.filters
  }

  pub fn options(&self) -> &FilterOptions {
    &self.options
  }

  pub fn set_filter(&mut self, field: FilterField, value: Option<String>) {
    self.filters.set(field, value);
  }

  pub fn clear_filters(&mut self) {
    self.filters.clear();
  }

  /// Loaded issues passing the active filters
  pub fn visible(&self) -> Vec<&Issue> {
    self.filters.apply(&self.issues)
  }
}
