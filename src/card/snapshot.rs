//! Time-boxed snapshot of a project's issues in the local store.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::KeyValueStore;
use crate::jira::types::Issue;

pub const CACHE_KEY_PREFIX: &str = "jira-issues-cache-";

/// Snapshots this old or older are refetched.
pub const SNAPSHOT_TTL_MS: i64 = 3 * 60 * 60 * 1000;

/// Issues of one project as captured at `timestamp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub issues: Vec<Issue>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub timestamp: DateTime<Utc>,
}

impl Snapshot {
  pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
    (now - self.timestamp).num_milliseconds() < SNAPSHOT_TTL_MS
  }
}

pub fn cache_key(project_key: &str) -> String {
  format!("{}{}", CACHE_KEY_PREFIX, project_key)
}

/// Snapshot cache on top of a key-value store
pub struct SnapshotCache<S: KeyValueStore> {
  store: S,
}

impl<S: KeyValueStore> SnapshotCache<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  /// Snapshot for `project_key` if one exists, parses, and is still fresh.
  ///
  /// Unreadable entries count as a miss.
  pub fn lookup(&self, project_key: &str, now: DateTime<Utc>) -> Option<Snapshot> {
    let key = cache_key(project_key);

    let raw = match self.store.get(&key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        warn!(%key, error = %e, "Failed to read cached issues");
        return None;
      }
    };

    let snapshot: Snapshot = match serde_json::from_str(&raw) {
      Ok(snapshot) => snapshot,
      Err(e) => {
        warn!(%key, error = %e, "Ignoring unparseable cached issues");
        return None;
      }
    };

    if !snapshot.is_fresh_at(now) {
      debug!(%key, captured = %snapshot.timestamp, "Cached issues expired");
      return None;
    }

    Some(snapshot)
  }

  /// Store `snapshot`, replacing whatever the project had.
  pub fn store(&self, project_key: &str, snapshot: &Snapshot) -> Result<()> {
    let value =
      serde_json::to_string(snapshot).map_err(|e| eyre!("Failed to serialize issues: {}", e))?;
    self.store.set(&cache_key(project_key), &value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::card::store::MemoryStore;
  use chrono::{Duration, TimeZone};
  use std::sync::Arc;

  fn issue(key: &str) -> Issue {
    Issue {
      key: key.to_string(),
      summary: format!("Summary of {}", key),
      status: Some("Open".to_string()),
      assignee: None,
      priority: None,
      issue_type: Some("Task".to_string()),
    }
  }

  fn captured() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
  }

  #[test]
  fn test_cache_key() {
    assert_eq!(cache_key("ABC"), "jira-issues-cache-ABC");
  }

  #[test]
  fn test_store_format() {
    let store = Arc::new(MemoryStore::new());
    let cache = SnapshotCache::new(store.clone());
    let snapshot = Snapshot {
      issues: vec![issue("ABC-1")],
      timestamp: captured(),
    };
    cache.store("ABC", &snapshot).unwrap();

    let raw = store.get("jira-issues-cache-ABC").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["timestamp"], captured().timestamp_millis());
    assert_eq!(value["issues"][0]["key"], "ABC-1");
  }

  #[test]
  fn test_fresh_snapshot_is_returned() {
    let cache = SnapshotCache::new(MemoryStore::new());
    let snapshot = Snapshot {
      issues: vec![issue("ABC-1"), issue("ABC-2")],
      timestamp: captured(),
    };
    cache.store("ABC", &snapshot).unwrap();

    let now = captured() + Duration::hours(2);
    assert_eq!(cache.lookup("ABC", now), Some(snapshot));
    assert_eq!(cache.lookup("XYZ", now), None);
  }

  #[test]
  fn test_ttl_boundary() {
    let cache = SnapshotCache::new(MemoryStore::new());
    cache
      .store(
        "ABC",
        &Snapshot {
          issues: vec![issue("ABC-1")],
          timestamp: captured(),
        },
      )
      .unwrap();

    let ttl = Duration::milliseconds(SNAPSHOT_TTL_MS);
    assert!(cache
      .lookup("ABC", captured() + ttl - Duration::milliseconds(1))
      .is_some());
    assert!(cache.lookup("ABC", captured() + ttl).is_none());
    assert!(cache
      .lookup("ABC", captured() + ttl + Duration::milliseconds(1))
      .is_none());
  }

  #[test]
  fn test_garbage_is_a_miss() {
    let store = Arc::new(MemoryStore::new());
    store.set("jira-issues-cache-ABC", "{not json").unwrap();
    let cache = SnapshotCache::new(store);

    assert_eq!(cache.lookup("ABC", captured()), None);
  }

  #[test]
  fn test_overwrite_replaces_snapshot() {
    let cache = SnapshotCache::new(MemoryStore::new());
    cache
      .store(
        "ABC",
        &Snapshot {
          issues: vec![issue("ABC-1")],
          timestamp: captured(),
        },
      )
      .unwrap();
    let newer = Snapshot {
      issues: vec![issue("ABC-9")],
      timestamp: captured() + Duration::minutes(5),
    };
    cache.store("ABC", &newer).unwrap();

    assert_eq!(
      cache.lookup("ABC", captured() + Duration::minutes(6)),
      Some(newer)
    );
  }
}
