use crate::card::filters::{FilterField, FilterSelection};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const SHORTCUTS: [(&str, &str); 7] = [
  ("t", "type"),
  ("a", "assignee"),
  ("s", "status"),
  ("p", "priority"),
  ("c", "clear"),
  ("r", "refresh"),
  ("q", "quit"),
];

/// Field whose picker the key opens
pub fn picker_field(key: char) -> Option<FilterField> {
  match key {
    't' => Some(FilterField::Type),
    'a' => Some(FilterField::Assignee),
    's' => Some(FilterField::Status),
    'p' => Some(FilterField::Priority),
    _ => None,
  }
}

/// Draw the active filters
pub fn draw_filter_bar(frame: &mut Frame, area: Rect, filters: &FilterSelection) {
  let mut spans = vec![Span::raw(" ")];

  for (i, field) in FilterField::ALL.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(
      format!("{}: ", field.label()),
      Style::default().fg(Color::Yellow),
    ));
    match filters.get(*field) {
      Some(value) => spans.push(Span::styled(
        value.to_string(),
        Style::default().fg(Color::Black).bg(Color::Cyan),
      )),
      None => spans.push(Span::styled("All", Style::default().fg(Color::Gray))),
    }
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the footer bar with key hints
pub fn draw_footer(frame: &mut Frame, area: Rect) {
  let mut spans = vec![Span::raw(" ")];

  for (key, label) in SHORTCUTS {
    spans.push(Span::styled(
      format!("<{}>", key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}   ", label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
