//! Facilities and employees: reference data owned outside the pipeline.
//!
//! Admissions point at these by id; the board only ever resolves them to a
//! display name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a campus or branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(pub String);

impl FacilityId {
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for FacilityId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for FacilityId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Identifier of a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for EmployeeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for EmployeeId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// A physical campus/branch location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
  pub id:   FacilityId,
  pub name: String,
}

/// A staff member who may be assigned to follow up on an admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:   EmployeeId,
  pub name: String,
}
