//! JQL for the card's issue search.

/// Statuses that never show up on the card.
pub const EXCLUDED_STATUSES: [&str; 3] = ["Closed", "Resolved", "Done"];

/// Upstream result cap. Anything beyond it is not returned.
pub const MAX_RESULTS: u32 = 1000;

/// Open issues of a single project.
pub fn open_issues_jql(project_key: &str) -> String {
  let excluded = EXCLUDED_STATUSES
    .iter()
    .map(|s| quote(s))
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    "project = {} AND status NOT IN ({})",
    quote(project_key),
    excluded
  )
}

/// Quote a JQL string literal
fn quote(value: &str) -> String {
  let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
  format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_open_issues_jql() {
    assert_eq!(
      open_issues_jql("ABC"),
      r#"project = "ABC" AND status NOT IN ("Closed", "Resolved", "Done")"#
    );
  }

  #[test]
  fn test_project_key_is_escaped() {
    assert_eq!(
      open_issues_jql(r#"A" OR project = "B"#),
      r#"project = "A\" OR project = \"B" AND status NOT IN ("Closed", "Resolved", "Done")"#
    );
  }
}
