use chrono::{DateTime, Utc};

/// "just now", "N minute(s) ago", "N hour(s) ago" or "N day(s) ago"
pub fn relative_time_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let seconds = (now - timestamp).num_seconds();

  if seconds < 60 {
    return "just now".to_string();
  }

  let minutes = seconds / 60;
  if minutes < 60 {
    return ago(minutes, "minute");
  }

  let hours = minutes / 60;
  if hours < 24 {
    return ago(hours, "hour");
  }

  ago(hours / 24, "day")
}

fn ago(n: i64, unit: &str) -> String {
  if n == 1 {
    format!("1 {} ago", unit)
  } else {
    format!("{} {}s ago", n, unit)
  }
}
