//! [`Board`]: the owned admission store behind the kanban.
//!
//! The record list is mutated through exactly two paths: a full reload
//! ([`Board::load`]) and a single-record stage patch (the optimistic updater
//! in [`crate::optimistic`]). Everything else is a pure query over it.

use std::collections::HashMap;

use intake_core::{
  AdmissionId, AdmissionRecord, AdmissionRepository, Employee, EmployeeId,
  Facility, FacilityId, Stage,
};

use crate::{
  filter::{FacilityFilter, Filters},
  notify::{Notifier, Toast},
  pipeline,
};

// ─── Load state ──────────────────────────────────────────────────────────────

/// Outcome of the most recent [`Board::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
  #[default]
  NotLoaded,
  Loaded,
  /// The last load failed; the records from before it are retained.
  Failed(String),
}

// ─── View mode ───────────────────────────────────────────────────────────────

/// Presentation toggle between kanban columns and a flat table. Both show the
/// same filtered records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
  #[default]
  Board,
  Table,
}

impl ViewMode {
  pub fn toggle(self) -> Self {
    match self {
      Self::Board => Self::Table,
      Self::Table => Self::Board,
    }
  }
}

// ─── Board ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Board {
  records:    Vec<AdmissionRecord>,
  facilities: Vec<Facility>,
  employees:  HashMap<EmployeeId, String>,
  filters:    Filters,
  load_state: LoadState,
}

impl Board {
  pub fn new() -> Self { Self::default() }

  /// A board pre-populated with `records`, as if freshly loaded.
  pub fn with_records(records: Vec<AdmissionRecord>) -> Self {
    Self { records, load_state: LoadState::Loaded, ..Self::default() }
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Fetch admissions and reference data from `repo`.
  ///
  /// Failures are reported through `notifier` and never returned: a failed
  /// admission fetch keeps the previously loaded records and marks the board
  /// [`LoadState::Failed`].
  pub async fn load<R, N>(&mut self, repo: &R, notifier: &mut N) -> &LoadState
  where
    R: AdmissionRepository,
    N: Notifier + ?Sized,
  {
    match repo.list_admissions().await {
      Ok(records) => {
        tracing::debug!(count = records.len(), "admissions loaded");
        self.records = records;
        self.load_state = LoadState::Loaded;
      }
      Err(e) => {
        tracing::warn!(error = %e, "failed to load admissions");
        notifier.notify(Toast::error("Could not load admissions", e.to_string()));
        self.load_state = LoadState::Failed(e.to_string());
      }
    }

    match repo.list_facilities().await {
      Ok(facilities) => self.facilities = facilities,
      Err(e) => {
        tracing::warn!(error = %e, "failed to load facilities");
        notifier.notify(Toast::error("Could not load facilities", e.to_string()));
      }
    }

    match repo.list_employees().await {
      Ok(employees) => self.set_employees(employees),
      Err(e) => {
        tracing::warn!(error = %e, "failed to load employees");
        notifier.notify(Toast::error("Could not load employees", e.to_string()));
      }
    }

    &self.load_state
  }

  pub fn load_state(&self) -> &LoadState { &self.load_state }

  pub fn set_facilities(&mut self, facilities: Vec<Facility>) {
    self.facilities = facilities;
  }

  pub fn set_employees(&mut self, employees: Vec<Employee>) {
    self.employees = employees.into_iter().map(|e| (e.id, e.name)).collect();
  }

  // ── Filters ───────────────────────────────────────────────────────────────

  pub fn filters(&self) -> &Filters { &self.filters }

  pub fn set_search_query(&mut self, text: impl Into<String>) {
    self.filters.search = text.into();
  }

  pub fn set_facility_filter(&mut self, filter: FacilityFilter) {
    self.filters.facility = filter;
  }

  /// Clear the search text and facility restriction together.
  pub fn reset_filters(&mut self) { self.filters = Filters::default(); }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// Every record, unfiltered, in load order.
  pub fn records(&self) -> &[AdmissionRecord] { &self.records }

  pub fn record(&self, id: &AdmissionId) -> Option<&AdmissionRecord> {
    self.records.iter().find(|r| &r.id == id)
  }

  /// Records passing the current filters, in load order.
  pub fn filtered(&self) -> Vec<&AdmissionRecord> {
    self.filters.apply(&self.records)
  }

  /// Filtered records in `stage`.
  pub fn bucket(&self, stage: Stage) -> Vec<&AdmissionRecord> {
    pipeline::bucket(self.filtered(), stage)
  }

  /// Filtered records grouped into every pipeline column.
  pub fn columns(&self) -> [(Stage, Vec<&AdmissionRecord>); 5] {
    pipeline::columns(&self.filtered())
  }

  /// Per-stage counts over the filtered view.
  pub fn stage_counts(&self) -> [(Stage, usize); 5] {
    pipeline::stage_counts(self.filtered())
  }

  pub fn facilities(&self) -> &[Facility] { &self.facilities }

  pub fn facility_name(&self, id: &FacilityId) -> Option<&str> {
    self
      .facilities
      .iter()
      .find(|f| &f.id == id)
      .map(|f| f.name.as_str())
  }

  /// Display name of the staff member assigned to `record`, if known.
  pub fn assignee_name(&self, record: &AdmissionRecord) -> Option<&str> {
    record
      .assigned_to
      .as_ref()
      .and_then(|id| self.employees.get(id))
      .map(String::as_str)
  }

  // ── Mutation ──────────────────────────────────────────────────────────────

  /// Set one record's stage, returning the stage it had before. `None` if the
  /// record is not on the board.
  pub(crate) fn patch_stage(&mut self, id: &AdmissionId, stage: Stage) -> Option<Stage> {
    let record = self.records.iter_mut().find(|r| &r.id == id)?;
    Some(std::mem::replace(&mut record.stage, stage))
  }
}
