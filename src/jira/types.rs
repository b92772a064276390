use serde::{Deserialize, Serialize};

/// Issue as shown on the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub key: String,
  pub summary: String,
  pub status: Option<String>,
  pub assignee: Option<Assignee>,
  pub priority: Option<String>,
  pub issue_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
  pub display_name: String,
  pub email: Option<String>,
}

impl Issue {
  pub fn assignee_name(&self) -> Option<&str> {
    self.assignee.as_ref().map(|a| a.display_name.as_str())
  }
}
