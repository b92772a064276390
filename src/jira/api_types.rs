//! Serde-deserializable types matching Jira search responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on what the card shows.

use serde::Deserialize;

use super::types::{Assignee, Issue};

// ============================================================================
// Common nested field types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiNamed {
  #[serde(default)]
  pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
  #[serde(default, rename = "displayName")]
  pub display_name: Option<String>,
  #[serde(default, rename = "emailAddress")]
  pub email_address: Option<String>,
}

// ============================================================================
// Search endpoint response
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ApiIssueFields {
  #[serde(default)]
  pub summary: String,
  pub status: Option<ApiNamed>,
  pub assignee: Option<ApiUser>,
  pub priority: Option<ApiNamed>,
  #[serde(rename = "issuetype")]
  pub issue_type: Option<ApiNamed>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
  pub key: String,
  #[serde(default)]
  pub fields: ApiIssueFields,
}

/// Body of `/rest/api/2/search`, as relayed by the proxy route.
///
/// Only `issues` matters to the card; a body without it is an empty result.
#[derive(Debug, Deserialize, Default)]
pub struct ApiSearchResponse {
  #[serde(default)]
  pub issues: Vec<ApiIssue>,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl From<ApiIssue> for Issue {
  fn from(issue: ApiIssue) -> Self {
    let f = issue.fields;
    Issue {
      key: issue.key,
      summary: f.summary,
      status: f.status.and_then(|s| s.name),
      assignee: f.assignee.and_then(ApiUser::into_assignee),
      priority: f.priority.and_then(|p| p.name),
      issue_type: f.issue_type.and_then(|t| t.name),
    }
  }
}

impl ApiUser {
  /// Named by display name, else by email. Neither means unassigned.
  fn into_assignee(self) -> Option<Assignee> {
    let display_name = self.display_name.or_else(|| self.email_address.clone())?;
    Some(Assignee {
      display_name,
      email: self.email_address,
    })
  }
}

impl ApiSearchResponse {
  pub fn into_issues(self) -> Vec<Issue> {
    self.issues.into_iter().map(Issue::from).collect()
  }
}
