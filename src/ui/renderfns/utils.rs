use crate::config::Theme;
use ratatui::prelude::Color;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Visual bucket of a Jira status name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
  Done,
  InProgress,
  Review,
  ToDo,
  Blocked,
  Testing,
  ReleasePending,
  Neutral,
}

impl StatusCategory {
  pub fn color(&self) -> Color {
    match self {
      StatusCategory::Done => Color::Green,
      StatusCategory::InProgress => Color::Blue,
      StatusCategory::Review => Color::Magenta,
      StatusCategory::ToDo => Color::Cyan,
      StatusCategory::Blocked => Color::Red,
      StatusCategory::Testing => Color::Yellow,
      StatusCategory::ReleasePending => Color::LightMagenta,
      StatusCategory::Neutral => Color::Gray,
    }
  }
}

/// Categorize a status by keyword; the first matching group wins.
pub fn status_category(status: &str) -> StatusCategory {
  let s = status.to_lowercase();
  let has = |keywords: &[&str]| keywords.iter().any(|k| s.contains(k));

  if has(&["done", "closed", "resolved"]) {
    StatusCategory::Done
  } else if has(&["in progress"]) {
    StatusCategory::InProgress
  } else if has(&["review"]) {
    StatusCategory::Review
  } else if has(&["to do", "todo", "new", "open"]) {
    StatusCategory::ToDo
  } else if has(&["blocked", "hold", "wait"]) {
    StatusCategory::Blocked
  } else if has(&["test", "qa"]) {
    StatusCategory::Testing
  } else if s.contains("release") && s.contains("pending") {
    StatusCategory::ReleasePending
  } else {
    StatusCategory::Neutral
  }
}

/// Get the display color for a Jira issue status
pub fn status_color(status: &str) -> Color {
  status_category(status).color()
}

/// Row background for an issue type, if it has one
pub fn type_highlight(issue_type: &str, theme: Theme) -> Option<Color> {
  let t = issue_type.to_lowercase();
  let has = |k: &str| t.contains(k);

  // (dark, light)
  let (dark, light) = if has("bug") {
    ((64, 24, 24), (255, 228, 228))
  } else if has("epic") {
    ((48, 32, 72), (238, 228, 255))
  } else if has("story") {
    ((24, 56, 32), (228, 250, 232))
  } else if has("spike") {
    ((64, 48, 16), (255, 244, 214))
  } else if has("task") {
    ((24, 40, 64), (226, 238, 255))
  } else if has("improvement") || has("enhancement") {
    ((16, 56, 56), (222, 248, 246))
  } else {
    return None;
  };

  let (r, g, b) = match theme {
    Theme::Dark => dark,
    Theme::Light => light,
  };
  Some(Color::Rgb(r, g, b))
}
