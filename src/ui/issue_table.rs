use crate::card::state::{CardPhase, IssueCard};
use crate::config::Theme;
use crate::jira::types::Issue;
use crate::ui::renderfns::{status_color, truncate, type_highlight};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

const COLUMNS: [&str; 6] = ["Key", "Summary", "Status", "Assignee", "Priority", "Type"];

/// Draw the filtered issues of the card
pub fn draw_issue_table(
  frame: &mut Frame,
  area: Rect,
  card: &IssueCard,
  theme: Theme,
  state: &mut TableState,
) {
  let visible = card.visible();

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if visible.is_empty() {
    let content = match card.phase() {
      CardPhase::Uninitialized => "",
      CardPhase::Loading => "Loading issues...",
      CardPhase::Loaded if card.issues().is_empty() => "No open issues.",
      CardPhase::Loaded => "No issues match the selected filters. Press 'c' to clear them.",
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  ensure_valid_selection(state, visible.len());

  let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c)))
    .style(Style::default().fg(Color::Yellow).bold());

  let rows: Vec<Row> = visible.iter().map(|issue| issue_row(issue, theme)).collect();

  let widths = [
    Constraint::Length(12),
    Constraint::Min(20),
    Constraint::Length(16),
    Constraint::Length(18),
    Constraint::Length(10),
    Constraint::Length(12),
  ];

  let table = Table::new(rows, widths)
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

  frame.render_stateful_widget(table, area, state);
}

fn issue_row(issue: &Issue, theme: Theme) -> Row<'static> {
  let status = issue.status.clone().unwrap_or_default();
  let status_style = Style::default().fg(status_color(&status));

  let cells = vec![
    Cell::from(Span::styled(
      issue.key.clone(),
      Style::default().fg(Color::Cyan),
    )),
    Cell::from(truncate(&issue.summary, 80)),
    Cell::from(Span::styled(truncate(&status, 16), status_style)),
    Cell::from(truncate(issue.assignee_name().unwrap_or("Unassigned"), 18)),
    Cell::from(issue.priority.clone().unwrap_or_default()),
    Cell::from(issue.issue_type.clone().unwrap_or_default()),
  ];

  let row = Row::new(cells);
  match issue
    .issue_type
    .as_deref()
    .and_then(|t| type_highlight(t, theme))
  {
    Some(bg) => row.style(Style::default().bg(bg).fg(text_color(theme))),
    None => row,
  }
}

fn text_color(theme: Theme) -> Color {
  match theme {
    Theme::Dark => Color::White,
    Theme::Light => Color::Black,
  }
}

/// Keep the selection inside the rows, selecting the first row if none
fn ensure_valid_selection(state: &mut TableState, len: usize) {
  match state.selected() {
    Some(idx) if idx >= len => state.select(Some(len.saturating_sub(1))),
    None if len > 0 => state.select(Some(0)),
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::card::loader::{LoadOutcome, LoadSource};
  use crate::jira::types::Assignee;
  use chrono::Utc;
  use ratatui::backend::TestBackend;
  use ratatui::buffer::Buffer;

  fn issue(key: &str, status: &str, issue_type: Option<&str>) -> Issue {
    Issue {
      key: key.to_string(),
      summary: format!("{} summary", key),
      status: Some(status.to_string()),
      assignee: Some(Assignee {
        display_name: "Alice".to_string(),
        email: None,
      }),
      priority: None,
      issue_type: issue_type.map(String::from),
    }
  }

  fn loaded_card(issues: Vec<Issue>) -> IssueCard {
    let mut card = IssueCard::new("ABC".to_string());
    card.apply(LoadOutcome {
      issues,
      fetched_at: Utc::now(),
      source: LoadSource::Network,
    });
    card
  }

  fn render(card: &IssueCard, theme: Theme) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(110, 6)).unwrap();
    let mut state = TableState::default();
    terminal
      .draw(|frame| draw_issue_table(frame, frame.area(), card, theme, &mut state))
      .unwrap();
    terminal.backend().buffer().clone()
  }

  /// Column where `word` starts on row `y`
  fn find_x(buf: &Buffer, y: u16, word: &str) -> u16 {
    let len = word.chars().count() as u16;
    (0..buf.area.width.saturating_sub(len))
      .find(|&x| (x..x + len).map(|i| buf[(i, y)].symbol()).collect::<String>() == word)
      .unwrap_or_else(|| panic!("{:?} not on row {}", word, y))
  }

  #[test]
  fn test_rows_carry_status_color_and_type_highlight() {
    let card = loaded_card(vec![
      issue("ABC-1", "Done", Some("Bug")),
      issue("ABC-2", "In Progress", None),
    ]);
    let buf = render(&card, Theme::Dark);

    // Border, header, then one line per issue
    let x = find_x(&buf, 2, "Done");
    assert_eq!(buf[(x, 2)].fg, Color::Green);
    assert_eq!(buf[(x, 2)].bg, type_highlight("Bug", Theme::Dark).unwrap());
    let x = find_x(&buf, 2, "Alice");
    assert_eq!(buf[(x, 2)].bg, type_highlight("Bug", Theme::Dark).unwrap());
    assert_eq!(buf[(x, 2)].fg, Color::White);

    let x = find_x(&buf, 3, "In Progress");
    assert_eq!(buf[(x, 3)].fg, Color::Blue);
    assert_eq!(buf[(x, 3)].bg, Color::Reset);
  }

  #[test]
  fn test_light_theme_highlight() {
    let card = loaded_card(vec![issue("ABC-1", "Open", Some("Story"))]);
    let buf = render(&card, Theme::Light);

    let x = find_x(&buf, 2, "ABC-1 summary");
    assert_eq!(buf[(x, 2)].bg, type_highlight("Story", Theme::Light).unwrap());
    assert_eq!(buf[(x, 2)].fg, Color::Black);
  }

  #[test]
  fn test_ensure_valid_selection() {
    let mut state = TableState::default();
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));

    state.select(Some(7));
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(2));
  }
}
