//! TUI rendering — orchestrates all panes.

pub mod board_view;
pub mod table_view;

use chrono::Local;
use intake_board::{Board, LoadState, Severity, ViewMode};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Mode};

// ─── Layout ───────────────────────────────────────────────────────────────────

/// Split the terminal into header, body and status bar rows.
fn rows(area: Rect) -> [Rect; 3] {
  Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .areas(area)
}

/// The body area for a terminal of size `area`. Mouse hit-testing uses the
/// same split as drawing.
pub fn body_area(area: Rect) -> Rect { rows(area)[1] }

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let [header, body, status] = rows(f.area());

  draw_header(f, header, app);
  match app.view {
    ViewMode::Board => board_view::draw(f, body, app),
    ViewMode::Table => table_view::draw(f, body, app),
  }
  draw_status(f, status, app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let total = app.board.records().len();
  let shown = app.board.filtered().len();

  let counts = if app.board.filters().is_active() {
    format!("{shown}/{total}")
  } else {
    total.to_string()
  };
  let mut left = vec![
    Span::styled(
      " intake ",
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(format!(
      " {counts} inquiries ({})  ·  {}",
      pipeline_summary(&app.board),
      app.facility_label()
    )),
  ];
  if !app.board.filters().search.is_empty() {
    left.push(Span::raw(format!("  ·  \"{}\"", app.board.filters().search)));
  }
  if app.in_flight > 0 {
    left.push(Span::styled(
      format!("  ·  saving {}", app.in_flight),
      Style::default().fg(Color::Yellow),
    ));
  }
  if let LoadState::Failed(_) = app.board.load_state() {
    left.push(Span::styled(
      "  ·  load failed",
      Style::default().fg(Color::LightRed),
    ));
  }

  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.content.len());
  left.push(Span::raw(" ".repeat(pad)));
  left.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(left)), inner);
}

/// Open inquiries plus a count for each closed stage, over the filtered view.
fn pipeline_summary(board: &Board) -> String {
  let counts = board.stage_counts();
  let open: usize = counts
    .iter()
    .filter(|(stage, _)| !stage.is_closed())
    .map(|(_, n)| n)
    .sum();
  let mut parts = vec![format!("{open} open")];
  parts.extend(
    counts
      .iter()
      .filter(|(stage, _)| stage.is_closed())
      .map(|(stage, n)| format!("{n} {}", stage.label().to_lowercase())),
  );
  parts.join(", ")
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (app.mode, app.view) {
    (Mode::Search, _) => ("SEARCH", "Type to filter  Enter keep  Esc clear"),
    (Mode::Carrying, _) => ("MOVE", "←→/hl choose column  Enter drop  Esc cancel"),
    (Mode::Normal, ViewMode::Board) => (
      "BOARD",
      "←↑↓→ move  m pick up  drag with mouse  / search  f facility  r reset  t table  g reload  q quit",
    ),
    (Mode::Normal, ViewMode::Table) => (
      "TABLE",
      "↑↓/jk navigate  / search  f facility  r reset  t board  g reload  q quit",
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let message = match app.toasts.current() {
    Some(toast) => {
      let colour = match toast.severity {
        Severity::Default => Color::Green,
        Severity::Destructive => Color::LightRed,
      };
      Span::styled(
        format!("  {}: {}", toast.title, toast.description),
        Style::default().fg(colour),
      )
    }
    None => Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  };

  let line = Line::from(vec![mode_span, message]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::Utc;
  use intake_core::{AdmissionId, AdmissionRecord, NewAdmission, Stage};

  #[test]
  fn summary_counts_open_and_closed_stages() {
    let records = [
      ("1", Stage::InitialContact),
      ("2", Stage::TrialLesson),
      ("3", Stage::ClosedWon),
      ("4", Stage::ClosedLost),
      ("5", Stage::ClosedLost),
    ]
    .map(|(id, stage)| AdmissionRecord {
      stage,
      ..NewAdmission::new("An").into_record(AdmissionId::from(id), Utc::now())
    });
    let board = Board::with_records(Vec::from(records));
    assert_eq!(pipeline_summary(&board), "2 open, 1 enrolled, 2 cancelled");
  }
}
