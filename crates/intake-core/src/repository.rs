//! The `AdmissionRepository` trait, the persistence seam of the pipeline.
//!
//! The trait is implemented by storage backends (`intake-store-sqlite`) and by
//! the HTTP client in `intake-cli`. The board logic in `intake-board` depends
//! on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  admission::{AdmissionId, AdmissionRecord, NewAdmission, Stage},
  directory::{Employee, Facility},
  error::RepositoryError,
};

/// Abstraction over wherever admission records live.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AdmissionRepository: Send + Sync {
  /// Classified so callers can tell a missing record or bad input from a
  /// backend failure.
  type Error: RepositoryError;

  // ── Admissions ────────────────────────────────────────────────────────

  /// Return the full, unfiltered set of admission records, oldest first.
  fn list_admissions(
    &self,
  ) -> impl Future<Output = Result<Vec<AdmissionRecord>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_admission<'a>(
    &'a self,
    id: &'a AdmissionId,
  ) -> impl Future<Output = Result<Option<AdmissionRecord>, Self::Error>> + Send + 'a;

  /// Persist a new record. `id` and `created_at` are assigned by the store.
  fn create_admission(
    &self,
    input: NewAdmission,
  ) -> impl Future<Output = Result<AdmissionRecord, Self::Error>> + Send + '_;

  /// Move a record to `stage` and return the updated record.
  ///
  /// Setting the stage a record already has is a successful no-op. Returns an
  /// error if `id` is unknown.
  fn update_admission_stage<'a>(
    &'a self,
    id: &'a AdmissionId,
    stage: Stage,
  ) -> impl Future<Output = Result<AdmissionRecord, Self::Error>> + Send + 'a;

  // ── Reference data ────────────────────────────────────────────────────

  fn list_facilities(
    &self,
  ) -> impl Future<Output = Result<Vec<Facility>, Self::Error>> + Send + '_;

  fn create_facility(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Facility, Self::Error>> + Send + '_;

  fn list_employees(
    &self,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  fn create_employee(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;
}
