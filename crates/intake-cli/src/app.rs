//! Application state machine and event dispatcher.

use std::{
  collections::VecDeque,
  sync::Arc,
  time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use intake_board::{
  Board, DragController, DropEffect, FacilityFilter, Notifier, StageChange,
  Toast, ViewMode,
};
use intake_core::{AdmissionRecord, AdmissionRepository, Stage};
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{client::ApiClient, ui};

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing into the search box.
  Search,
  /// A card has been picked up with the keyboard.
  Carrying,
}

// ─── Cursor ───────────────────────────────────────────────────────────────────

/// Card under the keyboard cursor on the board view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
  pub col: usize,
  pub row: usize,
}

// ─── Toasts ───────────────────────────────────────────────────────────────────

const TOAST_TTL: Duration = Duration::from_secs(4);
const TOAST_BACKLOG: usize = 16;

/// Recent notifications, newest last. Each toast is shown until it expires.
#[derive(Default)]
pub struct ToastQueue {
  items: VecDeque<(Toast, Instant)>,
}

impl ToastQueue {
  pub fn new() -> Self { Self::default() }

  /// The newest toast that has not yet expired.
  pub fn current(&self) -> Option<&Toast> {
    self
      .items
      .back()
      .filter(|(_, at)| at.elapsed() < TOAST_TTL)
      .map(|(toast, _)| toast)
  }

  /// Drop toasts that have expired.
  pub fn prune(&mut self) {
    self.items.retain(|(_, at)| at.elapsed() < TOAST_TTL);
  }
}

impl Notifier for ToastQueue {
  fn notify(&mut self, toast: Toast) {
    if toast.is_error() {
      tracing::warn!(title = %toast.title, "{}", toast.description);
    } else {
      tracing::info!(title = %toast.title, "{}", toast.description);
    }
    if self.items.len() == TOAST_BACKLOG {
      self.items.pop_front();
    }
    self.items.push_back((toast, Instant::now()));
  }
}

// ─── Completions ──────────────────────────────────────────────────────────────

/// The result of a spawned stage update, delivered back to the event loop.
#[derive(Debug)]
pub struct Completion {
  pub change: StageChange,
  pub result: Result<(), String>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Records, filters and lookups.
  pub board: Board,

  /// Pending drag payload, shared by mouse and keyboard gestures.
  pub drag: DragController,

  /// Board columns or flat table.
  pub view: ViewMode,

  pub mode: Mode,

  /// Cursor on the board view.
  pub cursor: Cursor,

  /// Cursor row on the table view.
  pub table_row: usize,

  /// Column currently accepting a drop, while dragging.
  pub hover: Option<usize>,

  pub toasts: ToastQueue,

  /// Stage updates sent but not yet settled.
  pub in_flight: usize,

  /// Full terminal area at the last draw; used for mouse hit-testing.
  pub viewport: Rect,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,

  completions_tx: UnboundedSender<Completion>,
  completions_rx: UnboundedReceiver<Completion>,
}

impl App {
  /// Create an [`App`] with an empty board.
  pub fn new(client: ApiClient) -> Self {
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    Self {
      board: Board::new(),
      drag: DragController::new(),
      view: ViewMode::Board,
      mode: Mode::Normal,
      cursor: Cursor::default(),
      table_row: 0,
      hover: None,
      toasts: ToastQueue::new(),
      in_flight: 0,
      viewport: Rect::default(),
      client: Arc::new(client),
      completions_tx,
      completions_rx,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch admissions, facilities and employees from the API.
  pub async fn load(&mut self) {
    self.board.load(self.client.as_ref(), &mut self.toasts).await;
    self.clamp_cursor();
  }

  // ── Selection ─────────────────────────────────────────────────────────────

  /// The record under the cursor in the active view, if any.
  pub fn selected_record(&self) -> Option<&AdmissionRecord> {
    match self.view {
      ViewMode::Board => self
        .board
        .bucket(Stage::ALL[self.cursor.col])
        .get(self.cursor.row)
        .copied(),
      ViewMode::Table => self.board.filtered().get(self.table_row).copied(),
    }
  }

  /// Keep both cursors inside the filtered view.
  pub fn clamp_cursor(&mut self) {
    let col_len = self.board.bucket(Stage::ALL[self.cursor.col]).len();
    self.cursor.row = self.cursor.row.min(col_len.saturating_sub(1));
    let table_len = self.board.filtered().len();
    self.table_row = self.table_row.min(table_len.saturating_sub(1));
  }

  fn move_column(&mut self, delta: isize) {
    let last = Stage::ALL.len() - 1;
    self.cursor.col = self.cursor.col.saturating_add_signed(delta).min(last);
    self.clamp_cursor();
  }

  fn move_row(&mut self, delta: isize) {
    match self.view {
      ViewMode::Board => {
        let len = self.board.bucket(Stage::ALL[self.cursor.col]).len();
        let row = self.cursor.row.saturating_add_signed(delta);
        self.cursor.row = row.min(len.saturating_sub(1));
      }
      ViewMode::Table => {
        let len = self.board.filtered().len();
        let row = self.table_row.saturating_add_signed(delta);
        self.table_row = row.min(len.saturating_sub(1));
      }
    }
  }

  // ── Filters ───────────────────────────────────────────────────────────────

  /// Advance the facility filter: all → each facility in turn → all.
  pub fn cycle_facility(&mut self) {
    let facilities = self.board.facilities();
    let next = match &self.board.filters().facility {
      FacilityFilter::All => facilities.first().map(|f| f.id.clone()),
      FacilityFilter::Only(current) => facilities
        .iter()
        .position(|f| &f.id == current)
        .and_then(|i| facilities.get(i + 1))
        .map(|f| f.id.clone()),
    };
    let filter = next.map_or(FacilityFilter::All, FacilityFilter::Only);
    self.board.set_facility_filter(filter);
    self.clamp_cursor();
  }

  /// Label of the active facility filter for the header.
  pub fn facility_label(&self) -> &str {
    match &self.board.filters().facility {
      FacilityFilter::All => "all facilities",
      FacilityFilter::Only(id) => self.board.facility_name(id).unwrap_or(id.as_str()),
    }
  }

  // ── Drag and drop ─────────────────────────────────────────────────────────

  /// Pick up the record under the cursor.
  fn start_drag(&mut self) -> bool {
    let Some(record) = self.selected_record().cloned() else {
      return false;
    };
    self.drag.on_drag_start(&record);
    self.drag_over(Some(self.cursor.col));
    true
  }

  /// The pointer (or keyboard carry) is over `col`.
  fn drag_over(&mut self, col: Option<usize>) {
    self.hover = col.filter(|_| {
      let mut effect = DropEffect::default();
      self.drag.on_drag_over(&mut effect);
      effect.allowed
    });
  }

  /// Drop the dragged record on `col`. Ignored drops change nothing.
  pub fn drop_on(&mut self, col: usize) {
    self.hover = None;
    let Some(&target) = Stage::ALL.get(col) else {
      self.drag.cancel();
      return;
    };
    let Some((id, target)) = self.drag.on_drop(target, &self.board) else {
      return;
    };
    let Some(change) = self.board.begin_stage_change(&id, target) else {
      return;
    };

    // Follow the card into its new column.
    if self.view == ViewMode::Board {
      self.cursor.col = target.column();
      self.cursor.row = self
        .board
        .bucket(target)
        .iter()
        .position(|r| r.id == id)
        .unwrap_or_default();
    }

    self.spawn_update(change);
  }

  /// Persist `change` on a background task; the result comes back through
  /// the completion channel.
  fn spawn_update(&mut self, change: StageChange) {
    self.in_flight += 1;
    let client = Arc::clone(&self.client);
    let tx = self.completions_tx.clone();
    tokio::spawn(async move {
      let result = client
        .update_admission_stage(&change.record_id, change.target_stage)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string());
      // The receiver only goes away when the app is shutting down.
      let _ = tx.send(Completion { change, result });
    });
  }

  /// Apply a finished stage update to the board.
  pub fn settle(&mut self, completion: Completion) {
    self.in_flight = self.in_flight.saturating_sub(1);
    self
      .board
      .settle(&completion.change, completion.result, &mut self.toasts);
    self.clamp_cursor();
  }

  /// Settle every completion that has already arrived.
  pub fn drain_completions(&mut self) {
    while let Ok(completion) = self.completions_rx.try_recv() {
      self.settle(completion);
    }
  }

  /// Wait for the next completion.
  #[cfg(test)]
  pub async fn next_completion(&mut self) -> Option<Completion> {
    self.completions_rx.recv().await
  }

  // ── Mouse handling ────────────────────────────────────────────────────────

  pub fn handle_mouse(&mut self, event: MouseEvent) {
    if self.view != ViewMode::Board || self.mode == Mode::Search {
      return;
    }
    let body = ui::body_area(self.viewport);
    let col = ui::board_view::column_at(body, event.column, event.row);

    match event.kind {
      MouseEventKind::Down(MouseButton::Left) => {
        let Some((col, row)) =
          ui::board_view::card_at(self, body, event.column, event.row)
        else {
          return;
        };
        self.cursor = Cursor { col, row };
        self.mode = Mode::Normal;
        self.start_drag();
      }
      MouseEventKind::Drag(MouseButton::Left) => {
        if self.drag.dragging().is_some() {
          self.drag_over(col);
        }
      }
      MouseEventKind::Up(MouseButton::Left) => {
        if self.drag.dragging().is_none() {
          return;
        }
        match col.filter(|c| self.hover == Some(*c)) {
          Some(c) => self.drop_on(c),
          None => {
            self.drag.cancel();
            self.hover = None;
          }
        }
      }
      _ => {}
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.mode {
      Mode::Search => {
        self.handle_search_key(key);
        Ok(true)
      }
      Mode::Carrying => {
        self.handle_carry_key(key);
        Ok(true)
      }
      Mode::Normal => self.handle_normal_key(key).await,
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let mut query = self.board.filters().search.clone();
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        query.clear();
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        query.pop();
      }
      KeyCode::Char(c) => query.push(c),
      _ => return,
    }
    self.board.set_search_query(query);
    self.clamp_cursor();
  }

  fn handle_carry_key(&mut self, key: KeyEvent) {
    let last = Stage::ALL.len() - 1;
    let target = self.hover.unwrap_or(self.cursor.col);
    match key.code {
      KeyCode::Left | KeyCode::Char('h') => self.drag_over(Some(target.saturating_sub(1))),
      KeyCode::Right | KeyCode::Char('l') => self.drag_over(Some((target + 1).min(last))),
      KeyCode::Enter | KeyCode::Char('m') => {
        self.mode = Mode::Normal;
        self.drop_on(target);
      }
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.drag.cancel();
        self.hover = None;
      }
      _ => {}
    }
  }

  async fn handle_normal_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => self.move_row(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_row(-1),
      KeyCode::Left | KeyCode::Char('h') if self.view == ViewMode::Board => {
        self.move_column(-1)
      }
      KeyCode::Right | KeyCode::Char('l') if self.view == ViewMode::Board => {
        self.move_column(1)
      }

      // Pick up the focused card
      KeyCode::Char('m') if self.view == ViewMode::Board => {
        if self.start_drag() {
          self.mode = Mode::Carrying;
        }
      }

      // Filters
      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Char('f') => self.cycle_facility(),
      KeyCode::Char('r') => {
        self.board.reset_filters();
        self.clamp_cursor();
      }

      // View
      KeyCode::Char('t') => self.view = self.view.toggle(),
      KeyCode::Char('g') => self.load().await,

      _ => {}
    }
    Ok(true)
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::Utc;
  use intake_board::Severity;
  use intake_core::{AdmissionId, Facility, NewAdmission};

  use crate::client::ApiConfig;

  /// An app pointed at a port nothing listens on.
  fn offline_app() -> App {
    let client = ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:9".into() }).unwrap();
    let mut app = App::new(client);
    let records = [
      ("1", "An", Stage::InitialContact, "F1"),
      ("2", "Binh", Stage::TrialLesson, "F2"),
      ("3", "Chi", Stage::InitialContact, "F2"),
    ]
    .map(|(id, name, stage, facility)| AdmissionRecord {
      stage,
      facility_id: Some(facility.into()),
      ..NewAdmission::new(name).into_record(AdmissionId::from(id), Utc::now())
    });
    app.board = Board::with_records(records.to_vec());
    app.board.set_facilities(vec![
      Facility { id: "F1".into(), name: "North".into() },
      Facility { id: "F2".into(), name: "Riverside".into() },
    ]);
    app.viewport = Rect::new(0, 0, 120, 40);
    app
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
  }

  #[tokio::test]
  async fn search_mode_filters_live_and_escape_clears() {
    let mut app = offline_app();
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    for c in "bi".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    assert_eq!(app.board.filtered().len(), 1);

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.board.filtered().len(), 3);
  }

  #[tokio::test]
  async fn facility_cycle_wraps_back_to_all() {
    let mut app = offline_app();
    app.handle_key(key(KeyCode::Char('f'))).await.unwrap();
    assert_eq!(app.facility_label(), "North");
    app.handle_key(key(KeyCode::Char('f'))).await.unwrap();
    assert_eq!(app.facility_label(), "Riverside");
    app.handle_key(key(KeyCode::Char('f'))).await.unwrap();
    assert_eq!(app.facility_label(), "all facilities");
  }

  #[tokio::test]
  async fn reset_clears_search_and_facility() {
    let mut app = offline_app();
    app.board.set_search_query("an");
    app.cycle_facility();
    app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
    assert!(!app.board.filters().is_active());
  }

  #[tokio::test]
  async fn carry_and_escape_leaves_record_in_place() {
    let mut app = offline_app();
    app.handle_key(key(KeyCode::Char('m'))).await.unwrap();
    assert_eq!(app.mode, Mode::Carrying);
    app.handle_key(key(KeyCode::Char('l'))).await.unwrap();
    assert_eq!(app.hover, Some(1));
    app.handle_key(key(KeyCode::Esc)).await.unwrap();

    assert!(app.drag.dragging().is_none());
    assert_eq!(app.in_flight, 0);
    assert_eq!(app.board.record(&"1".into()).unwrap().stage, Stage::InitialContact);
  }

  #[tokio::test]
  async fn dropping_on_own_column_sends_nothing() {
    let mut app = offline_app();
    app.handle_key(key(KeyCode::Char('m'))).await.unwrap();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.in_flight, 0);
    assert!(app.toasts.current().is_none());
  }

  #[tokio::test]
  async fn failed_keyboard_move_is_optimistic_then_rolled_back() {
    let mut app = offline_app();
    app.handle_key(key(KeyCode::Char('m'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('l'))).await.unwrap();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    // Applied before the request can possibly have finished.
    assert_eq!(app.board.record(&"1".into()).unwrap().stage, Stage::Consultation);
    assert_eq!(app.cursor, Cursor { col: 1, row: 0 });
    assert_eq!(app.in_flight, 1);

    let completion = app.next_completion().await.unwrap();
    assert!(completion.result.is_err());
    app.settle(completion);

    assert_eq!(app.in_flight, 0);
    assert_eq!(app.board.record(&"1".into()).unwrap().stage, Stage::InitialContact);
    let toast = app.toasts.current().unwrap();
    assert_eq!(toast.severity, Severity::Destructive);
  }

  #[tokio::test]
  async fn mouse_drag_between_columns_starts_update() {
    let mut app = offline_app();
    let body = ui::body_area(app.viewport);
    let cols = ui::board_view::column_rects(body);
    let (card_x, card_y) = ui::board_view::card_origin(cols[0], 0);

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), card_x, card_y));
    assert!(app.drag.dragging().is_some());

    let target = cols[2];
    app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), target.x + 2, target.y + 2));
    assert_eq!(app.hover, Some(2));
    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), target.x + 2, target.y + 2));

    assert_eq!(app.board.record(&"1".into()).unwrap().stage, Stage::TrialLesson);
    assert_eq!(app.in_flight, 1);
  }

  #[tokio::test]
  async fn mouse_release_outside_columns_cancels() {
    let mut app = offline_app();
    let body = ui::body_area(app.viewport);
    let cols = ui::board_view::column_rects(body);
    let (card_x, card_y) = ui::board_view::card_origin(cols[0], 0);

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), card_x, card_y));
    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5, 0));

    assert!(app.drag.dragging().is_none());
    assert_eq!(app.in_flight, 0);
  }

  #[test]
  fn toast_queue_keeps_newest_and_bounds_backlog() {
    let mut queue = ToastQueue::new();
    for i in 0..(TOAST_BACKLOG + 4) {
      queue.notify(Toast::success("t", format!("{i}")));
    }
    assert_eq!(queue.items.len(), TOAST_BACKLOG);
    let expected = format!("{}", TOAST_BACKLOG + 3);
    assert_eq!(queue.current().unwrap().description, expected);
  }
}
