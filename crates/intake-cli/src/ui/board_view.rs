//! Kanban board with one column per stage.

use intake_core::{AdmissionRecord, Stage};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Position, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Rows occupied by one card, including the gap below it.
pub const CARD_HEIGHT: u16 = 3;

// ─── Geometry ─────────────────────────────────────────────────────────────────

/// The five column rectangles inside `body`, in pipeline order.
pub fn column_rects(body: Rect) -> [Rect; 5] {
  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 5); 5])
    .areas(body)
}

/// Area inside a column's border.
fn column_inner(rect: Rect) -> Rect {
  Rect {
    x:      rect.x.saturating_add(1),
    y:      rect.y.saturating_add(1),
    width:  rect.width.saturating_sub(2),
    height: rect.height.saturating_sub(2),
  }
}

fn visible_cards(rect: Rect) -> usize { (column_inner(rect).height / CARD_HEIGHT) as usize }

/// Index of the first card drawn in column `col`. Only the cursor column
/// scrolls.
fn scroll_offset(app: &App, col: usize, visible: usize) -> usize {
  if col != app.cursor.col || visible == 0 {
    return 0;
  }
  (app.cursor.row + 1).saturating_sub(visible)
}

/// Column under the point `(x, y)`, if any.
pub fn column_at(body: Rect, x: u16, y: u16) -> Option<usize> {
  column_rects(body)
    .iter()
    .position(|rect| rect.contains(Position { x, y }))
}

/// `(column, row)` of the card under `(x, y)`, if any.
pub fn card_at(app: &App, body: Rect, x: u16, y: u16) -> Option<(usize, usize)> {
  let col = column_at(body, x, y)?;
  let rect = column_rects(body)[col];
  let inner = column_inner(rect);
  if !inner.contains(Position { x, y }) {
    return None;
  }
  let slot = ((y - inner.y) / CARD_HEIGHT) as usize;
  let row = scroll_offset(app, col, visible_cards(rect)) + slot;
  (row < app.board.bucket(Stage::ALL[col]).len()).then_some((col, row))
}

/// Top-left cell of the card drawn in `slot` of `column`.
pub fn card_origin(column: Rect, slot: u16) -> (u16, u16) {
  let inner = column_inner(column);
  (inner.x, inner.y + slot * CARD_HEIGHT)
}

// ─── Draw ─────────────────────────────────────────────────────────────────────

/// Render the board into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rects = column_rects(area);
  let dragged = app.drag.dragging();

  for ((stage, records), rect) in app.board.columns().into_iter().zip(rects) {
    let col = stage.column();
    let border = if app.hover == Some(col) && dragged.is_some() {
      Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if col == app.cursor.col {
      Style::default().fg(Color::Cyan)
    } else {
      Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
      .title(format!(" {} ({}) ", stage.label(), records.len()))
      .borders(Borders::ALL)
      .border_style(border);
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    if records.is_empty() {
      f.render_widget(
        Paragraph::new(Span::styled("No inquiries", Style::default().fg(Color::DarkGray))),
        inner,
      );
      continue;
    }

    let offset = scroll_offset(app, col, visible_cards(rect));
    for (slot, (row, record)) in records
      .iter()
      .enumerate()
      .skip(offset)
      .take(visible_cards(rect))
      .enumerate()
    {
      let card = Rect {
        x:      inner.x,
        y:      inner.y + slot as u16 * CARD_HEIGHT,
        width:  inner.width,
        height: CARD_HEIGHT.min(inner.height),
      };
      let focused = col == app.cursor.col && row == app.cursor.row;
      let lifted = dragged == Some(&record.id);
      draw_card(f, card, app, record, focused, lifted);
    }
  }
}

fn draw_card(
  f: &mut Frame,
  area: Rect,
  app: &App,
  record: &AdmissionRecord,
  focused: bool,
  lifted: bool,
) {
  let name_style = match (focused, lifted) {
    (_, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    (true, false) => Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
    (false, false) => Style::default().add_modifier(Modifier::BOLD),
  };
  let marker = if lifted { "↕ " } else { "" };

  let contact = record
    .parent_name
    .as_deref()
    .or(record.parent_phone.as_deref())
    .or(record.student_phone.as_deref())
    .unwrap_or("—");
  let mut detail = vec![Span::raw(contact.to_string())];
  if let Some(facility) = record
    .facility_id
    .as_ref()
    .and_then(|id| app.board.facility_name(id))
  {
    detail.push(Span::raw(format!(" · {facility}")));
  }
  if let Some(assignee) = app.board.assignee_name(record) {
    detail.push(Span::raw(format!(" · {assignee}")));
  }

  let lines = vec![
    Line::from(Span::styled(format!("{marker}{}", record.student_name), name_style)),
    Line::from(detail).style(Style::default().fg(Color::Gray)),
  ];
  f.render_widget(Paragraph::new(lines), area);
}
