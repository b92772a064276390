//! Keeps the "updated ..." label current while a snapshot is shown.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::relative_time::relative_time_label;
use crate::event::Event;

pub const RELATIVE_TIME_PERIOD: Duration = Duration::from_secs(60);

/// Periodic relative-time updater tied to one snapshot timestamp.
///
/// The task is aborted when the timestamp changes, on `stop`, and on drop.
pub struct RelativeTimeTicker {
  period: Duration,
  tracked: Option<(DateTime<Utc>, JoinHandle<()>)>,
}

impl Default for RelativeTimeTicker {
  fn default() -> Self {
    Self::new()
  }
}

impl RelativeTimeTicker {
  pub fn new() -> Self {
    Self::with_period(RELATIVE_TIME_PERIOD)
  }

  pub fn with_period(period: Duration) -> Self {
    Self {
      period,
      tracked: None,
    }
  }

  /// Emit a label for `timestamp` now and then once per period.
  pub fn track(&mut self, timestamp: DateTime<Utc>, tx: mpsc::UnboundedSender<Event>) {
    if matches!(&self.tracked, Some((current, _)) if *current == timestamp) {
      return;
    }
    self.stop();

    let period = self.period;
    let handle = tokio::spawn(async move {
      let mut interval = tokio::time::interval(period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        interval.tick().await;
        let label = relative_time_label(timestamp, Utc::now());
        if tx.send(Event::RelativeTime(label)).is_err() {
          break;
        }
      }
    });

    self.tracked = Some((timestamp, handle));
  }

  pub fn stop(&mut self) {
    if let Some((_, handle)) = self.tracked.take() {
      handle.abort();
    }
  }

  #[cfg(test)]
  pub fn tracked(&self) -> Option<DateTime<Utc>> {
    self.tracked.as_ref().map(|(timestamp, _)| *timestamp)
  }
}

impl Drop for RelativeTimeTicker {
  fn drop(&mut self) {
    self.stop();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration as ChronoDuration;

  fn label_of(event: Event) -> String {
    match event {
      Event::RelativeTime(label) => label,
      other => panic!("unexpected event {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_emits_immediately_and_repeats() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = RelativeTimeTicker::with_period(Duration::from_millis(10));

    ticker.track(Utc::now() - ChronoDuration::seconds(90), tx);

    assert_eq!(label_of(rx.recv().await.unwrap()), "1 minute ago");
    assert_eq!(label_of(rx.recv().await.unwrap()), "1 minute ago");
  }

  #[tokio::test]
  async fn test_stop_cancels_task() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = RelativeTimeTicker::with_period(Duration::from_millis(10));

    ticker.track(Utc::now(), tx);
    rx.recv().await.unwrap();
    ticker.stop();
    assert!(ticker.tracked().is_none());

    // The aborted task drops its sender, closing the channel
    while rx.recv().await.is_some() {}
  }

  #[tokio::test]
  async fn test_drop_cancels_task() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    {
      let mut ticker = RelativeTimeTicker::with_period(Duration::from_millis(10));
      ticker.track(Utc::now(), tx);
    }
    while rx.recv().await.is_some() {}
  }

  #[tokio::test]
  async fn test_new_timestamp_replaces_task() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = RelativeTimeTicker::with_period(Duration::from_secs(3600));

    let first = Utc::now() - ChronoDuration::hours(2);
    ticker.track(first, tx.clone());
    assert_eq!(label_of(rx.recv().await.unwrap()), "2 hours ago");

    // Same timestamp: the running task is kept, nothing new is emitted
    ticker.track(first, tx.clone());
    assert_eq!(ticker.tracked(), Some(first));

    let second = Utc::now();
    ticker.track(second, tx);
    assert_eq!(ticker.tracked(), Some(second));
    assert_eq!(label_of(rx.recv().await.unwrap()), "just now");
  }
}
