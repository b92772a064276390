pub mod components;
mod issue_table;
pub mod renderfns;

use crate::app::App;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Length(1), // Active filters
      Constraint::Min(1),    // Issues
      Constraint::Length(1), // Key hints
    ])
    .split(frame.area());

  renderfns::draw_header(frame, chunks[0], app.card(), app.updated_label());
  renderfns::draw_filter_bar(frame, chunks[1], app.card().filters());

  let theme = app.theme();
  let (card, table_state) = app.table_parts();
  issue_table::draw_issue_table(frame, chunks[2], card, theme, table_state);

  renderfns::draw_footer(frame, chunks[3]);

  if app.picker().is_active() {
    app.picker().render_overlay(frame, chunks[2]);
  }
}
