//! Flat table of the filtered inquiries.

use intake_core::Stage;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Span,
  widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::app::App;

fn stage_colour(stage: Stage) -> Color {
  match stage {
    Stage::InitialContact => Color::Blue,
    Stage::Consultation => Color::Magenta,
    Stage::TrialLesson => Color::Yellow,
    Stage::ClosedWon => Color::Green,
    Stage::ClosedLost => Color::Red,
  }
}

/// Render the table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let records = app.board.filtered();

  let block = Block::default()
    .title(format!(" Inquiries ({}) ", records.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let header = Row::new(["Student", "Parent", "Phone", "Facility", "Stage", "Assigned", "First contact"])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

  let rows = records.iter().map(|record| {
    let dash = || "—".to_string();
    let phone = record
      .parent_phone
      .clone()
      .or_else(|| record.student_phone.clone())
      .unwrap_or_else(dash);
    let facility = record
      .facility_id
      .as_ref()
      .and_then(|id| app.board.facility_name(id))
      .map_or_else(dash, str::to_owned);
    let assignee = app.board.assignee_name(record).map_or_else(dash, str::to_owned);
    let first_contact = record
      .first_contact_date
      .map_or_else(dash, |d| d.format("%Y-%m-%d").to_string());

    Row::new([
      Cell::from(record.student_name.clone()),
      Cell::from(record.parent_name.clone().unwrap_or_else(dash)),
      Cell::from(phone),
      Cell::from(facility),
      Cell::from(Span::styled(
        record.stage.label(),
        Style::default().fg(stage_colour(record.stage)),
      )),
      Cell::from(assignee),
      Cell::from(first_contact),
    ])
  });

  let widths = [
    Constraint::Percentage(18),
    Constraint::Percentage(16),
    Constraint::Percentage(14),
    Constraint::Percentage(14),
    Constraint::Percentage(12),
    Constraint::Percentage(14),
    Constraint::Percentage(12),
  ];

  let mut state = TableState::default();
  state.select((!records.is_empty()).then_some(app.table_row));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}
