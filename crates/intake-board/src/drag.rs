//! Drag controller: turns drag-start / drag-over / drop gestures into a
//! `(record id, target stage)` pair.

use intake_core::{AdmissionId, AdmissionRecord, Stage};

use crate::board::Board;

/// The pending drag payload. The id survives from drag start until drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
  #[default]
  Idle,
  Dragging(AdmissionId),
}

/// Whether the area under the pointer accepts a drop. Drop targets start out
/// refusing drops until a drag-over handler allows them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropEffect {
  pub allowed: bool,
}

#[derive(Debug, Default)]
pub struct DragController {
  state: DragState,
}

impl DragController {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> &DragState { &self.state }

  /// The id being dragged, if any.
  pub fn dragging(&self) -> Option<&AdmissionId> {
    match &self.state {
      DragState::Idle => None,
      DragState::Dragging(id) => Some(id),
    }
  }

  pub fn on_drag_start(&mut self, record: &AdmissionRecord) {
    self.state = DragState::Dragging(record.id.clone());
  }

  /// Mark the hovered column as a valid drop target.
  pub fn on_drag_over(&self, effect: &mut DropEffect) { effect.allowed = true; }

  /// Resolve a drop on `target`. The controller is always back to idle
  /// afterwards.
  ///
  /// Returns `None` when nothing was being dragged, when the dragged record
  /// is no longer on the board, or when it already sits in `target`.
  pub fn on_drop(&mut self, target: Stage, board: &Board) -> Option<(AdmissionId, Stage)> {
    let DragState::Dragging(id) = std::mem::take(&mut self.state) else {
      return None;
    };
    let record = board.record(&id)?;
    if record.stage == target {
      return None;
    }
    Some((id, target))
  }

  /// Abandon the drag without dropping.
  pub fn cancel(&mut self) { self.state = DragState::Idle; }
}
