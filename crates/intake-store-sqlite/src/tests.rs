//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use intake_core::{
  AdmissionId, AdmissionRepository, ErrorKind, NewAdmission, RepositoryError as _,
  Stage,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn inquiry(name: &str) -> NewAdmission {
  NewAdmission {
    parent_name: Some(format!("Parent of {name}")),
    student_phone: Some("0901 234 567".into()),
    ..NewAdmission::new(name)
  }
}

// ─── Admissions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_admission() {
  let s = store().await;

  let mut input = inquiry("An");
  input.date_of_birth = NaiveDate::from_ymd_opt(2015, 3, 9);
  input.first_contact_date = NaiveDate::from_ymd_opt(2024, 8, 1);
  let record = s.create_admission(input).await.unwrap();
  assert_eq!(record.stage, Stage::InitialContact);

  let fetched = s.get_admission(&record.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, record.id);
  assert_eq!(fetched.student_name, "An");
  assert_eq!(fetched.parent_name.as_deref(), Some("Parent of An"));
  assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(2015, 3, 9));
  assert_eq!(fetched.first_contact_date, NaiveDate::from_ymd_opt(2024, 8, 1));
  assert_eq!(fetched, record);
  assert_eq!(s.list_admissions().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn get_admission_missing_returns_none() {
  let s = store().await;
  let result = s.get_admission(&AdmissionId::from("nope")).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn create_rejects_blank_student_name() {
  let s = store().await;
  let err = s.create_admission(NewAdmission::new("  ")).await.unwrap_err();
  assert!(matches!(err, Error::Core(intake_core::Error::BlankField(_))));
}

#[tokio::test]
async fn list_admissions_preserves_insertion_order() {
  let s = store().await;
  for name in ["An", "Binh", "Chi"] {
    s.create_admission(inquiry(name)).await.unwrap();
  }

  let all = s.list_admissions().await.unwrap();
  let names: Vec<_> = all.iter().map(|r| r.student_name.as_str()).collect();
  assert_eq!(names, ["An", "Binh", "Chi"]);
}

#[tokio::test]
async fn create_with_explicit_stage() {
  let s = store().await;
  let mut input = inquiry("Dung");
  input.stage = Some(Stage::TrialLesson);
  let record = s.create_admission(input).await.unwrap();
  assert_eq!(record.stage, Stage::TrialLesson);
}

// ─── Stage updates ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_stage_persists() {
  let s = store().await;
  let record = s.create_admission(inquiry("An")).await.unwrap();

  let updated = s
    .update_admission_stage(&record.id, Stage::Consultation)
    .await
    .unwrap();
  assert_eq!(updated.stage, Stage::Consultation);

  let fetched = s.get_admission(&record.id).await.unwrap().unwrap();
  assert_eq!(fetched.stage, Stage::Consultation);
  assert_eq!(fetched.student_name, "An");
}

#[tokio::test]
async fn update_stage_to_same_value_is_idempotent() {
  let s = store().await;
  let record = s.create_admission(inquiry("An")).await.unwrap();

  let first = s
    .update_admission_stage(&record.id, Stage::ClosedWon)
    .await
    .unwrap();
  let second = s
    .update_admission_stage(&record.id, Stage::ClosedWon)
    .await
    .unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn update_stage_unknown_id_is_not_found() {
  let s = store().await;
  let err = s
    .update_admission_stage(&AdmissionId::from("ghost"), Stage::ClosedLost)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert!(matches!(err, Error::AdmissionNotFound(id) if id.as_str() == "ghost"));
}

#[tokio::test]
async fn any_stage_can_move_to_any_other() {
  let s = store().await;
  let record = s.create_admission(inquiry("An")).await.unwrap();

  for stage in [Stage::ClosedLost, Stage::InitialContact, Stage::ClosedWon] {
    let updated = s.update_admission_stage(&record.id, stage).await.unwrap();
    assert_eq!(updated.stage, stage);
  }
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn facilities_and_employees_roundtrip() {
  let s = store().await;
  let north = s.create_facility("North campus".into()).await.unwrap();
  s.create_facility("Central".into()).await.unwrap();
  let mai = s.create_employee(" Mai ".into()).await.unwrap();
  assert_eq!(mai.name, "Mai");

  let facilities = s.list_facilities().await.unwrap();
  let names: Vec<_> = facilities.iter().map(|f| f.name.as_str()).collect();
  assert_eq!(names, ["Central", "North campus"]);

  let mut input = inquiry("An");
  input.facility_id = Some(north.id.clone());
  input.assigned_to = Some(mai.id.clone());
  let record = s.create_admission(input).await.unwrap();

  let fetched = s.get_admission(&record.id).await.unwrap().unwrap();
  assert_eq!(fetched.facility_id, Some(north.id));
  assert_eq!(fetched.assigned_to, Some(mai.id));
  assert_eq!(s.list_employees().await.unwrap().len(), 1);
}

#[tokio::test]
async fn admission_with_unknown_facility_is_rejected() {
  let s = store().await;
  let mut input = inquiry("An");
  input.facility_id = Some("missing".into());
  let err = s.create_admission(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(intake_core::Error::UnknownFacility(ref id)) if id.as_str() == "missing"
  ));
  assert_eq!(err.kind(), ErrorKind::InvalidInput);
  assert!(s.list_admissions().await.unwrap().is_empty());
}

#[tokio::test]
async fn admission_with_unknown_assignee_is_accepted() {
  let s = store().await;
  let mut input = inquiry("An");
  input.assigned_to = Some("ghost-employee".into());
  let record = s.create_admission(input).await.unwrap();

  let fetched = s.get_admission(&record.id).await.unwrap().unwrap();
  assert_eq!(fetched.assigned_to.as_ref().map(|e| e.as_str()), Some("ghost-employee"));
}

#[tokio::test]
async fn blank_facility_name_is_rejected() {
  let s = store().await;
  assert!(s.create_facility("   ".into()).await.is_err());
}

// ─── Encoding ────────────────────────────────────────────────────────────────

#[test]
fn stored_stage_keys_are_the_wire_keys() {
  use crate::encode::{decode_stage, encode_stage};

  for stage in Stage::ALL {
    assert_eq!(encode_stage(stage), stage.to_string());
    assert_eq!(decode_stage(&encode_stage(stage)).unwrap(), stage);
  }
  assert_eq!(encode_stage(Stage::TrialLesson), "trial_lesson");
}
