//! Admission records, one per prospective-student inquiry, and the pipeline
//! stage each one sits in.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{EmployeeId, Error, FacilityId, Result};

// ─── Stage ───────────────────────────────────────────────────────────────────

/// The pipeline bucket of an admission record.
///
/// The declaration order is the column order on the board. It carries no
/// transition constraint: a record may move from any stage to any other.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
  #[default]
  InitialContact,
  Consultation,
  TrialLesson,
  ClosedWon,
  /// Cancelled; reachable from every other stage.
  ClosedLost,
}

impl Stage {
  /// Every stage, in board column order.
  pub const ALL: [Stage; 5] = [
    Stage::InitialContact,
    Stage::Consultation,
    Stage::TrialLesson,
    Stage::ClosedWon,
    Stage::ClosedLost,
  ];

  /// Parse the snake_case key used on the wire and in storage.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownStage(s.to_owned()))
  }

  /// Column heading shown to users.
  pub fn label(self) -> &'static str {
    match self {
      Self::InitialContact => "Initial contact",
      Self::Consultation => "Consultation",
      Self::TrialLesson => "Trial lesson",
      Self::ClosedWon => "Enrolled",
      Self::ClosedLost => "Cancelled",
    }
  }

  pub fn is_closed(self) -> bool {
    matches!(self, Self::ClosedWon | Self::ClosedLost)
  }

  /// Position of this stage in [`Stage::ALL`].
  pub fn column(self) -> usize {
    Self::ALL.iter().position(|s| *s == self).unwrap_or_default()
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Identifier of an admission record. Never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdmissionId(pub String);

impl AdmissionId {
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for AdmissionId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for AdmissionId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A prospective-student inquiry tracked through the enrollment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
  pub id:                 AdmissionId,
  pub student_name:       String,
  pub parent_name:        Option<String>,
  pub student_phone:      Option<String>,
  pub parent_phone:       Option<String>,
  pub email:              Option<String>,
  pub date_of_birth:      Option<NaiveDate>,
  pub address:            Option<String>,
  pub facility_id:        Option<FacilityId>,
  pub first_contact_date: Option<NaiveDate>,
  pub stage:              Stage,
  /// Staff member following up; used for display only.
  pub assigned_to:        Option<EmployeeId>,
  pub notes:              Option<String>,
  /// Server-assigned; never changes after creation.
  pub created_at:         DateTime<Utc>,
}

// ─── NewAdmission ────────────────────────────────────────────────────────────

/// Input to [`crate::repository::AdmissionRepository::create_admission`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAdmission {
  pub student_name:       String,
  #[serde(default)]
  pub parent_name:        Option<String>,
  #[serde(default)]
  pub student_phone:      Option<String>,
  #[serde(default)]
  pub parent_phone:       Option<String>,
  #[serde(default)]
  pub email:              Option<String>,
  #[serde(default)]
  pub date_of_birth:      Option<NaiveDate>,
  #[serde(default)]
  pub address:            Option<String>,
  #[serde(default)]
  pub facility_id:        Option<FacilityId>,
  #[serde(default)]
  pub first_contact_date: Option<NaiveDate>,
  #[serde(default)]
  pub stage:              Option<Stage>,
  #[serde(default)]
  pub assigned_to:        Option<EmployeeId>,
  #[serde(default)]
  pub notes:              Option<String>,
}

impl NewAdmission {
  /// Convenience constructor with every optional field empty.
  pub fn new(student_name: impl Into<String>) -> Self {
    Self { student_name: student_name.into(), ..Self::default() }
  }

  /// Reject inputs a record cannot be built from.
  pub fn validate(&self) -> Result<()> {
    if self.student_name.trim().is_empty() {
      return Err(Error::BlankField("student_name"));
    }
    Ok(())
  }

  /// Build the stored record. Stage defaults to `initial_contact`.
  pub fn into_record(
    self,
    id: AdmissionId,
    created_at: DateTime<Utc>,
  ) -> AdmissionRecord {
    AdmissionRecord {
      id,
      student_name: self.student_name.trim().to_owned(),
      parent_name: self.parent_name,
      student_phone: self.student_phone,
      parent_phone: self.parent_phone,
      email: self.email,
      date_of_birth: self.date_of_birth,
      address: self.address,
      facility_id: self.facility_id,
      first_contact_date: self.first_contact_date,
      stage: self.stage.unwrap_or_default(),
      assigned_to: self.assigned_to,
      notes: self.notes,
      created_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stage_keys_roundtrip_through_parse() {
    for stage in Stage::ALL {
      assert_eq!(Stage::parse(stage.as_ref()).unwrap(), stage);
    }
    assert_eq!(Stage::TrialLesson.to_string(), "trial_lesson");
  }

  #[test]
  fn unknown_stage_is_rejected() {
    let err = Stage::parse("enrolled").unwrap_err();
    assert!(matches!(err, Error::UnknownStage(s) if s == "enrolled"));
  }

  #[test]
  fn stage_serde_uses_snake_case_keys() {
    let json = serde_json::to_string(&Stage::ClosedLost).unwrap();
    assert_eq!(json, "\"closed_lost\"");
    assert!(serde_json::from_str::<Stage>("\"won\"").is_err());
  }

  #[test]
  fn column_matches_declaration_order() {
    assert_eq!(Stage::InitialContact.column(), 0);
    assert_eq!(Stage::ClosedLost.column(), 4);
    assert!(Stage::ClosedWon.is_closed());
    assert!(!Stage::TrialLesson.is_closed());
  }

  #[test]
  fn new_admission_defaults_to_initial_contact() {
    let record = NewAdmission::new("  An ")
      .into_record(AdmissionId::from("1"), Utc::now());
    assert_eq!(record.stage, Stage::InitialContact);
    assert_eq!(record.student_name, "An");
  }

  #[test]
  fn blank_student_name_fails_validation() {
    assert!(matches!(
      NewAdmission::new("   ").validate(),
      Err(Error::BlankField("student_name"))
    ));
  }
}
