//! Async query abstraction for loading data off the event loop.
//!
//! A `Query<T>` owns a fetcher closure and runs it on a spawned task. The
//! event loop polls it on every tick and takes the result when it arrives.
//!
//! # Example
//!
//! ```ignore
//! let mut query = Query::new(move |mode| {
//!     let loader = loader.clone();
//!     async move {
//!         match mode {
//!             FetchMode::CacheFirst => loader.load("ABC").await,
//!             FetchMode::Network => loader.refresh("ABC").await,
//!         }
//!         .map_err(|e| e.to_string())
//!     }
//! });
//!
//! query.fetch();
//!
//! // In event loop tick
//! if let Some(result) = query.poll() {
//!     // Apply the result
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// How a fetch should treat cached data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
  /// Cached data may answer
  CacheFirst,
  /// Always go to the network
  Network,
}

/// The state of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
  /// No fetch in flight
  Idle,
  /// A fetch is running
  Loading,
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn(FetchMode) -> BoxFuture<T> + Send + Sync>;

/// Async query for data fetching.
///
/// Only the most recently started fetch can deliver a result: `refetch`
/// drops the channel of the one in flight.
pub struct Query<T> {
  state: QueryState,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time `fetch()` or `refetch()` is invoked.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(FetchMode) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move |mode| Box::pin(fetcher(mode))),
      receiver: None,
    }
  }

  /// Check if the query is currently loading.
  pub fn is_loading(&self) -> bool {
    self.state == QueryState::Loading
  }

  /// Start a cache-first fetch if not already loading.
  pub fn fetch(&mut self) {
    if self.is_loading() {
      return;
    }
    self.start_fetch(FetchMode::CacheFirst);
  }

  /// Force a network fetch, replacing any fetch in flight.
  pub fn refetch(&mut self) {
    // Cancel any pending fetch by dropping the receiver
    self.receiver = None;
    self.start_fetch(FetchMode::Network);
  }

  /// Poll for the result of the pending fetch.
  ///
  /// Returns `Some` exactly once per completed fetch. Call this in your
  /// event loop tick handler.
  pub fn poll(&mut self) -> Option<Result<T, String>> {
    let receiver = self.receiver.as_mut()?;

    let result = match receiver.try_recv() {
      Ok(result) => result,
      Err(mpsc::error::TryRecvError::Empty) => return None,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - treat as error
        Err("Query was cancelled".to_string())
      }
    };

    self.receiver = None;
    self.state = QueryState::Idle;
    Some(result)
  }

  fn start_fetch(&mut self, mode: FetchMode) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)(mode);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
  }
}

impl<T> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
