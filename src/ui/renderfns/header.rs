use crate::card::state::IssueCard;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar: project, issue counts, snapshot age
pub fn draw_header(frame: &mut Frame, area: Rect, card: &IssueCard, updated: Option<&str>) {
  let visible = card.visible().len();
  let total = card.issues().len();

  let counts = if visible == total {
    format!(" {} open ", total)
  } else {
    format!(" {} of {} open ", visible, total)
  };

  let mut spans = vec![
    Span::styled(" Jira Issues ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", card.project_key()),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(counts, Style::default().fg(Color::White)),
  ];

  if card.is_loading() {
    spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      " loading... ",
      Style::default().fg(Color::Yellow),
    ));
  } else if let Some(updated) = updated {
    spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      format!(" Updated {} ", updated),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
