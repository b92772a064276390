use crate::jira::types::Issue;
use std::collections::BTreeSet;

/// Field the card can filter issues by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
  Type,
  Assignee,
  Status,
  Priority,
}

impl FilterField {
  pub const ALL: [FilterField; 4] = [
    FilterField::Type,
    FilterField::Assignee,
    FilterField::Status,
    FilterField::Priority,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      FilterField::Type => "Type",
      FilterField::Assignee => "Assignee",
      FilterField::Status => "Status",
      FilterField::Priority => "Priority",
    }
  }

  /// Extract the value of this filter field from an issue
  fn extract<'a>(&self, issue: &'a Issue) -> Option<&'a str> {
    match self {
      FilterField::Type => issue.issue_type.as_deref(),
      FilterField::Assignee => issue.assignee_name(),
      FilterField::Status => issue.status.as_deref(),
      FilterField::Priority => issue.priority.as_deref(),
    }
  }

  /// Distinct non-empty values across `issues`, sorted
  pub fn vocabulary(&self, issues: &[Issue]) -> Vec<String> {
    let values: BTreeSet<&str> = issues
      .iter()
      .filter_map(|issue| self.extract(issue))
      .filter(|v| !v.is_empty())
      .collect();
    values.into_iter().map(String::from).collect()
  }
}

/// Active equality filters. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
  pub issue_type: Option<String>,
  pub assignee: Option<String>,
  pub status: Option<String>,
  pub priority: Option<String>,
}

impl FilterSelection {
  pub fn get(&self, field: FilterField) -> Option<&str> {
    self.slot(field).as_deref()
  }

  /// Set a filter; an empty value clears it
  pub fn set(&mut self, field: FilterField, value: Option<String>) {
    *self.slot_mut(field) = value.filter(|v| !v.is_empty());
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    FilterField::ALL.iter().all(|f| self.get(*f).is_none())
  }

  /// True when the issue passes every active filter.
  /// An issue without a value for a field never matches a filter on it.
  pub fn matches(&self, issue: &Issue) -> bool {
    FilterField::ALL.iter().all(|field| match self.get(*field) {
      None => true,
      Some(wanted) => field.extract(issue) == Some(wanted),
    })
  }

  pub fn apply<'a>(&self, issues: &'a [Issue]) -> Vec<&'a Issue> {
    issues.iter().filter(|issue| self.matches(issue)).collect()
  }

  fn slot(&self, field: FilterField) -> &Option<String> {
    match field {
      FilterField::Type => &self.issue_type,
      FilterField::Assignee => &self.assignee,
      FilterField::Status => &self.status,
      FilterField::Priority => &self.priority,
    }
  }

  fn slot_mut(&mut self, field: FilterField) -> &mut Option<String> {
    match field {
      FilterField::Type => &mut self.issue_type,
      FilterField::Assignee => &mut self.assignee,
      FilterField::Status => &mut self.status,
      FilterField::Priority => &mut self.priority,
    }
  }
}

/// Selectable values per field, derived from the loaded issues
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
  pub types: Vec<String>,
  pub assignees: Vec<String>,
  pub statuses: Vec<String>,
  pub priorities: Vec<String>,
}

impl FilterOptions {
  pub fn derive(issues: &[Issue]) -> Self {
    Self {
      types: FilterField::Type.vocabulary(issues),
      assignees: FilterField::Assignee.vocabulary(issues),
      statuses: FilterField::Status.vocabulary(issues),
      priorities: FilterField::Priority.vocabulary(issues),
    }
  }

  pub fn for_field(&self, field: FilterField) -> &[String] {
    match field {
      FilterField::Type => &self.types,
      FilterField::Assignee => &self.assignees,
      FilterField::Status => &self.statuses,
      FilterField::Priority => &self.priorities,
    }
  }
}
