//! Optimistic stage updates.
//!
//! A move is captured as a [`StageChange`] command value. Beginning it patches
//! the board immediately; settling it either keeps the patch or applies the
//! inverse command. Moves on different records are independent and may
//! settle in any order.
//!
//! Overlapping moves of the *same* record are not serialised: whichever
//! settles last decides the final stage.

use std::fmt::Display;

use intake_core::{AdmissionId, AdmissionRepository, Stage};

use crate::{
  board::Board,
  notify::{Notifier, Toast},
};

/// A stage move that has been applied locally and awaits persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChange {
  pub record_id:      AdmissionId,
  pub previous_stage: Stage,
  pub target_stage:   Stage,
  /// Student name at the time of the move, for notifications.
  pub record_name:    String,
}

/// How a move ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
  /// Unknown record or same-stage target; nothing happened.
  Ignored,
  /// Persisted; the optimistic stage is final.
  Moved,
  /// Persistence failed; the record is back in its previous stage.
  RolledBack,
}

impl Board {
  /// Apply a move locally and return the command to settle later.
  ///
  /// Returns `None` without touching anything if the record is not on the
  /// board or already in `target`.
  pub fn begin_stage_change(&mut self, id: &AdmissionId, target: Stage) -> Option<StageChange> {
    let record = self.record(id)?;
    if record.stage == target {
      return None;
    }
    let record_name = record.student_name.clone();
    let previous_stage = self.patch_stage(id, target)?;

    tracing::debug!(%id, from = %previous_stage, to = %target, "stage change applied");
    Some(StageChange {
      record_id: id.clone(),
      previous_stage,
      target_stage: target,
      record_name,
    })
  }

  /// Resolve a begun change with the persistence result.
  ///
  /// On failure the record's stage is restored to exactly
  /// `change.previous_stage`. One notification is issued either way.
  pub fn settle<E, N>(
    &mut self,
    change: &StageChange,
    result: Result<(), E>,
    notifier: &mut N,
  ) -> MoveOutcome
  where
    E: Display,
    N: Notifier + ?Sized,
  {
    match result {
      Ok(()) => {
        notifier.notify(Toast::success(
          "Stage updated",
          format!("{} moved to {}", change.record_name, change.target_stage),
        ));
        MoveOutcome::Moved
      }
      Err(e) => {
        tracing::warn!(
          id = %change.record_id,
          restored = %change.previous_stage,
          error = %e,
          "stage change failed, rolling back"
        );
        self.patch_stage(&change.record_id, change.previous_stage);
        notifier.notify(Toast::error(
          "Update failed",
          format!(
            "Could not move {} to {}: {e}",
            change.record_name, change.target_stage
          ),
        ));
        MoveOutcome::RolledBack
      }
    }
  }

  /// Begin, persist and settle a move in one go. Exactly one persistence
  /// call is made unless the move is ignored; there is no retry.
  pub async fn move_record<R, N>(
    &mut self,
    repo: &R,
    id: &AdmissionId,
    target: Stage,
    notifier: &mut N,
  ) -> MoveOutcome
  where
    R: AdmissionRepository,
    N: Notifier + ?Sized,
  {
    let Some(change) = self.begin_stage_change(id, target) else {
      return MoveOutcome::Ignored;
    };
    let result = repo
      .update_admission_stage(&change.record_id, change.target_stage)
      .await
      .map(|_| ());
    self.settle(&change, result, notifier)
  }
}
