use super::KeyResult;
use crate::card::filters::FilterField;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the filter picker that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPickerEvent {
  /// A value was chosen; `None` is "All"
  Selected(FilterField, Option<String>),
  /// Picker cancelled
  Cancelled,
}

/// Popup for choosing one field's filter value
#[derive(Debug, Clone, Default)]
pub struct FilterPicker {
  field: Option<FilterField>,
  values: Vec<String>,
  /// 0 = All, 1+ = index into values
  selected: usize,
}

impl FilterPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.field.is_some()
  }

  /// Show the picker, preselecting `current`
  pub fn show(&mut self, field: FilterField, values: Vec<String>, current: Option<&str>) {
    self.selected = current
      .and_then(|c| values.iter().position(|v| v == c))
      .map(|idx| idx + 1)
      .unwrap_or(0);
    self.field = Some(field);
    self.values = values;
  }

  pub fn hide(&mut self) {
    self.field = None;
    self.values.clear();
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterPickerEvent> {
    let Some(field) = self.field else {
      return KeyResult::NotHandled;
    };
    let total = self.values.len() + 1;

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(FilterPickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let value = match self.selected {
          0 => None,
          idx => self.values.get(idx - 1).cloned(),
        };
        self.hide();
        KeyResult::Event(FilterPickerEvent::Selected(field, value))
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.selected = (self.selected + 1) % total;
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.selected = if self.selected == 0 {
          total - 1
        } else {
          self.selected - 1
        };
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(field) = self.field else {
      return;
    };

    let max_len = self
      .values
      .iter()
      .map(|v| v.chars().count())
      .max()
      .unwrap_or(0)
      .max(field.label().len() + 4);
    let width = (max_len as u16 + 6)
      .max(20)
      .min(area.width.saturating_sub(4));
    let height = (self.values.len() as u16 + 3)
      .max(3)
      .min(area.height.saturating_sub(2));

    // Center the overlay
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", field.label()));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let mut items = vec![ListItem::new(Line::from(Span::styled(
      "All",
      Style::default().fg(Color::Gray),
    )))];
    items.extend(self.values.iter().map(|value| {
      ListItem::new(Line::from(Span::styled(
        value.as_str(),
        Style::default().fg(Color::Cyan),
      )))
    }));

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
