//! Core types and trait definitions for the Intake admissions pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod admission;
pub mod directory;
pub mod error;
pub mod repository;

pub use admission::{AdmissionId, AdmissionRecord, NewAdmission, Stage};
pub use directory::{Employee, EmployeeId, Facility, FacilityId};
pub use error::{Error, ErrorKind, RepositoryError, Result};
pub use repository::AdmissionRepository;
