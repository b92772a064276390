use crate::card::loader::{IssueLoader, LoadOutcome};
use crate::card::source::IssueSource;
use crate::card::state::IssueCard;
use crate::card::store::KeyValueStore;
use crate::card::ticker::RelativeTimeTicker;
use crate::config::Theme;
use crate::event::{Event, EventHandler};
use crate::query::{FetchMode, Query};
use crate::ui;
use crate::ui::components::{FilterPicker, FilterPickerEvent, KeyResult};
use crate::ui::renderfns::picker_field;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::TableState;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Main application state
pub struct App {
  card: IssueCard,

  /// Cache-first load or forced refresh of the card's issues
  query: Query<LoadOutcome>,

  /// Writes the accepted outcome to the snapshot cache
  persist: Box<dyn Fn(&LoadOutcome)>,

  /// Keeps the "Updated ..." label current
  ticker: RelativeTimeTicker,
  updated_label: Option<String>,

  theme: Theme,
  table_state: TableState,
  picker: FilterPicker,

  /// Set once the event loop runs
  event_tx: Option<mpsc::UnboundedSender<Event>>,

  should_quit: bool,
}

impl App {
  /// Build the card. A fresh cached snapshot is shown right away,
  /// otherwise the card starts loading.
  pub fn new<S, F>(project_key: String, loader: Arc<IssueLoader<S, F>>, theme: Theme) -> Self
  where
    S: KeyValueStore + 'static,
    F: IssueSource,
  {
    let mut card = IssueCard::new(project_key.clone());
    let cached = loader.cached(&project_key);

    let persist = {
      let loader = loader.clone();
      let project_key = project_key.clone();
      Box::new(move |outcome: &LoadOutcome| loader.persist(&project_key, outcome))
    };

    let mut query = Query::new(move |mode| {
      let loader = loader.clone();
      let project_key = project_key.clone();
      async move {
        match mode {
          FetchMode::CacheFirst => loader.load(&project_key).await,
          FetchMode::Network => loader.refresh(&project_key).await,
        }
        .map_err(|e| e.to_string())
      }
    });

    match cached {
      Some(outcome) => card.apply(outcome),
      None => {
        card.begin_loading();
        query.fetch();
      }
    }

    Self {
      card,
      query,
      persist,
      ticker: RelativeTimeTicker::new(),
      updated_label: None,
      theme,
      table_state: TableState::default(),
      picker: FilterPicker::new(),
      event_tx: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = Some(events.sender());
    self.track_snapshot();

    let result = self.event_loop(&mut terminal, &mut events).await;
    self.ticker.stop();

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.poll_query(),
      Event::RelativeTime(label) => self.updated_label = Some(label),
    }
  }

  fn poll_query(&mut self) {
    match self.query.poll() {
      Some(Ok(outcome)) => {
        debug!(source = ?outcome.source, count = outcome.issues.len(), "Issues loaded");
        // Only the latest fetch gets here, so only it reaches the cache
        (self.persist)(&outcome);
        self.card.apply(outcome);
        self.track_snapshot();
      }
      Some(Err(e)) => self.card.fail(&e),
      None => {}
    }
  }

  /// Point the relative time label at the shown snapshot
  fn track_snapshot(&mut self) {
    if let (Some(fetched_at), Some(tx)) = (self.card.fetched_at(), &self.event_tx) {
      self.ticker.track(fetched_at, tx.clone());
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    // The open picker gets the key first
    match self.picker.handle_key(key) {
      KeyResult::Event(FilterPickerEvent::Selected(field, value)) => {
        self.card.set_filter(field, value);
        return;
      }
      KeyResult::Event(FilterPickerEvent::Cancelled) | KeyResult::Handled => return,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }
      KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Char('c') => self.card.clear_filters(),
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char(ch) => {
        if let Some(field) = picker_field(ch) {
          let values = self.card.options().for_field(field).to_vec();
          let current = self.card.filters().get(field).map(str::to_string);
          self.picker.show(field, values, current.as_deref());
        }
      }
      _ => {}
    }
  }

  /// Manual refresh: always goes to the network
  fn refresh(&mut self) {
    self.card.begin_loading();
    self.query.refetch();
  }

  pub fn card(&self) -> &IssueCard {
    &self.card
  }

  pub fn updated_label(&self) -> Option<&str> {
    self.updated_label.as_deref()
  }

  pub fn theme(&self) -> Theme {
    self.theme
  }

  pub fn picker(&self) -> &FilterPicker {
    &self.picker
  }

  /// The card and the table selection, borrowed together for drawing
  pub fn table_parts(&mut self) -> (&IssueCard, &mut TableState) {
    (&self.card, &mut self.table_state)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::card::filters::FilterField;
  use crate::card::snapshot::{cache_key, Snapshot};
  use crate::card::state::CardPhase;
  use crate::card::store::MemoryStore;
  use crate::jira::types::Issue;
  use chrono::Utc;
  use color_eyre::eyre::eyre;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::collections::VecDeque;
  use std::sync::Mutex;

  fn issue(key: &str, status: &str) -> Issue {
    Issue {
      key: key.to_string(),
      summary: String::new(),
      status: Some(status.to_string()),
      assignee: None,
      priority: None,
      issue_type: None,
    }
  }

  #[derive(Clone, Default)]
  struct FakeSource {
    calls: Arc<AtomicUsize>,
    next: Arc<Mutex<Option<Vec<Issue>>>>,
  }

  impl FakeSource {
    fn answering(issues: Vec<Issue>) -> Self {
      let source = Self::default();
      *source.next.lock().unwrap() = Some(issues);
      source
    }
  }

  impl IssueSource for FakeSource {
    async fn fetch_issues(&self, _project_key: &str) -> color_eyre::Result<Vec<Issue>> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self
        .next
        .lock()
        .unwrap()
        .clone()
        .ok_or_else(|| eyre!("Failed to fetch issues: 500 Internal Server Error"))
    }
  }

  /// Answers each call with the next scripted reply, after its delay
  #[derive(Clone, Default)]
  struct ScriptedSource {
    replies: Arc<Mutex<VecDeque<(u64, Vec<Issue>)>>>,
  }

  impl IssueSource for ScriptedSource {
    async fn fetch_issues(&self, _project_key: &str) -> color_eyre::Result<Vec<Issue>> {
      let reply = self.replies.lock().unwrap().pop_front();
      let (delay_ms, issues) = reply.ok_or_else(|| eyre!("no scripted reply left"))?;
      tokio::time::sleep(Duration::from_millis(delay_ms)).await;
      Ok(issues)
    }
  }

  fn cached_keys(store: &MemoryStore) -> Vec<String> {
    let snapshot: Snapshot =
      serde_json::from_str(&store.get(&cache_key("ABC")).unwrap().unwrap()).unwrap();
    snapshot.issues.into_iter().map(|i| i.key).collect()
  }

  fn shown_keys(app: &App) -> Vec<String> {
    app.card().issues().iter().map(|i| i.key.clone()).collect()
  }

  fn seeded_store(issues: Vec<Issue>) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let snapshot = Snapshot {
      issues,
      timestamp: Utc::now(),
    };
    store
      .set(&cache_key("ABC"), &serde_json::to_string(&snapshot).unwrap())
      .unwrap();
    store
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  /// Tick until the query delivers
  async fn settle(app: &mut App) {
    for _ in 0..100 {
      app.handle_event(Event::Tick);
      if !app.card().is_loading() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("query never settled");
  }

  #[tokio::test]
  async fn test_fresh_cache_shows_without_loading() {
    let store = seeded_store(vec![issue("ABC-1", "Open")]);
    let source = FakeSource::answering(vec![issue("ABC-2", "Open")]);
    let loader = Arc::new(IssueLoader::new(store, source.clone()));

    let app = App::new("ABC".to_string(), loader, Theme::Dark);

    assert_eq!(app.card().phase(), CardPhase::Loaded);
    assert_eq!(app.card().issues(), &[issue("ABC-1", "Open")]);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_missing_cache_loads_from_source() {
    let source = FakeSource::answering(vec![issue("ABC-2", "Open")]);
    let loader = Arc::new(IssueLoader::new(Arc::new(MemoryStore::new()), source.clone()));

    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);
    assert_eq!(app.card().phase(), CardPhase::Loading);

    settle(&mut app).await;
    assert_eq!(app.card().issues(), &[issue("ABC-2", "Open")]);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refresh_key_fetches_despite_fresh_cache() {
    let store = seeded_store(vec![issue("ABC-1", "Open")]);
    let source = FakeSource::answering(vec![issue("ABC-3", "In Progress")]);
    let loader = Arc::new(IssueLoader::new(store, source.clone()));
    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);

    app.handle_key(key(KeyCode::Char('r')));
    assert!(app.card().is_loading());

    settle(&mut app).await;
    assert_eq!(app.card().issues(), &[issue("ABC-3", "In Progress")]);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_fetch_is_cached() {
    let store = Arc::new(MemoryStore::new());
    let source = FakeSource::answering(vec![issue("ABC-2", "Open")]);
    let loader = Arc::new(IssueLoader::new(store.clone(), source));

    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);
    settle(&mut app).await;

    assert_eq!(cached_keys(&store), vec!["ABC-2"]);
  }

  #[tokio::test]
  async fn test_superseded_fetch_is_neither_shown_nor_cached() {
    let store = Arc::new(MemoryStore::new());
    let source = ScriptedSource::default();
    source
      .replies
      .lock()
      .unwrap()
      .extend([(200, vec![issue("OLD-1", "Open")]), (0, vec![issue("NEW-1", "Open")])]);
    let loader = Arc::new(IssueLoader::new(store.clone(), source));

    // The initial load is slow; a refresh overtakes it
    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.handle_key(key(KeyCode::Char('r')));
    settle(&mut app).await;

    // Let the initial load finish too
    tokio::time::sleep(Duration::from_millis(300)).await;
    app.handle_event(Event::Tick);

    assert_eq!(shown_keys(&app), vec!["NEW-1"]);
    assert_eq!(cached_keys(&store), vec!["NEW-1"]);
  }

  #[tokio::test]
  async fn test_failed_refresh_keeps_issues() {
    let store = seeded_store(vec![issue("ABC-1", "Open")]);
    let loader = Arc::new(IssueLoader::new(store, FakeSource::default()));
    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);

    app.handle_key(key(KeyCode::Char('r')));
    settle(&mut app).await;

    assert_eq!(app.card().phase(), CardPhase::Loaded);
    assert_eq!(app.card().issues(), &[issue("ABC-1", "Open")]);
  }

  #[tokio::test]
  async fn test_status_picker_filters_and_clear_resets() {
    let store = seeded_store(vec![
      issue("ABC-1", "Open"),
      issue("ABC-2", "In Progress"),
      issue("ABC-3", "Open"),
    ]);
    let loader = Arc::new(IssueLoader::new(store, FakeSource::default()));
    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);

    // Vocabulary is sorted: "In Progress", "Open"
    app.handle_key(key(KeyCode::Char('s')));
    assert!(app.picker().is_active());
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));

    assert!(!app.picker().is_active());
    assert_eq!(app.card().filters().get(FilterField::Status), Some("Open"));
    let keys: Vec<&str> = app.card().visible().iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, vec!["ABC-1", "ABC-3"]);

    app.handle_key(key(KeyCode::Char('c')));
    assert_eq!(app.card().visible().len(), 3);
  }

  #[tokio::test]
  async fn test_quit_keys() {
    let loader = Arc::new(IssueLoader::new(
      seeded_store(vec![]),
      FakeSource::default(),
    ));
    let mut app = App::new("ABC".to_string(), loader, Theme::Dark);

    // With the picker open, q only closes it
    app.handle_key(key(KeyCode::Char('p')));
    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.should_quit);
    assert!(!app.picker().is_active());

    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }
}
