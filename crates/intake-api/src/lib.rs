//! JSON REST API for the Intake admissions pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`intake_core::AdmissionRepository`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", intake_api::api_router(store.clone()))
//! ```

pub mod admissions;
pub mod directory;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use intake_core::AdmissionRepository;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AdmissionRepository + 'static,
{
  Router::new()
    // Admissions
    .route("/admissions", get(admissions::list::<S>).post(admissions::create::<S>))
    .route("/admissions/{id}", get(admissions::get_one::<S>))
    .route("/admissions/{id}/stage", patch(admissions::update_stage::<S>))
    // Reference data
    .route(
      "/facilities",
      get(directory::list_facilities::<S>).post(directory::create_facility::<S>),
    )
    .route(
      "/employees",
      get(directory::list_employees::<S>).post(directory::create_employee::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use intake_core::{AdmissionRecord, Facility, NewAdmission, Stage};
  use intake_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    api_router(store).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body<T: serde::de::DeserializeOwned>(resp: Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn seed_one(store: &SqliteStore) -> AdmissionRecord {
    store.create_admission(NewAdmission::new("An")).await.unwrap()
  }

  // ── Admissions ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_empty_store_returns_empty_array() {
    let resp = send(make_store().await, "GET", "/admissions", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<AdmissionRecord> = json_body(resp).await;
    assert!(records.is_empty());
  }

  #[tokio::test]
  async fn create_returns_201_and_lists_record() {
    let store = make_store().await;
    let resp = send(
      store.clone(),
      "POST",
      "/admissions",
      Some(json!({ "student_name": "Binh", "parent_phone": "0912 888 777" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: AdmissionRecord = json_body(resp).await;
    assert_eq!(created.stage, Stage::InitialContact);

    let resp = send(store, "GET", "/admissions", None).await;
    let records: Vec<AdmissionRecord> = json_body(resp).await;
    assert_eq!(records, vec![created]);
  }

  #[tokio::test]
  async fn create_with_blank_name_returns_400() {
    let resp = send(
      make_store().await,
      "POST",
      "/admissions",
      Some(json!({ "student_name": "  " })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("student_name"));
  }

  #[tokio::test]
  async fn create_with_unknown_facility_returns_400() {
    let store = make_store().await;
    let resp = send(
      store.clone(),
      "POST",
      "/admissions",
      Some(json!({ "student_name": "An", "facility_id": "F-missing" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("F-missing"));
    assert!(store.list_admissions().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_with_unknown_assignee_returns_201() {
    let resp = send(
      make_store().await,
      "POST",
      "/admissions",
      Some(json!({ "student_name": "An", "assigned_to": "E-missing" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn get_unknown_admission_returns_404() {
    let resp = send(make_store().await, "GET", "/admissions/missing", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Stage updates ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_stage_updates_record() {
    let store = make_store().await;
    let record = seed_one(&store).await;

    let resp = send(
      store.clone(),
      "PATCH",
      &format!("/admissions/{}/stage", record.id),
      Some(json!({ "stage": "consultation" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: AdmissionRecord = json_body(resp).await;
    assert_eq!(updated.stage, Stage::Consultation);

    let stored = store.get_admission(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.stage, Stage::Consultation);
  }

  #[tokio::test]
  async fn patch_stage_with_unknown_stage_is_rejected() {
    let store = make_store().await;
    let record = seed_one(&store).await;

    let resp = send(
      store.clone(),
      "PATCH",
      &format!("/admissions/{}/stage", record.id),
      Some(json!({ "stage": "enrolled" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let stored = store.get_admission(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.stage, Stage::InitialContact);
  }

  #[tokio::test]
  async fn patch_stage_unknown_id_returns_404() {
    let resp = send(
      make_store().await,
      "PATCH",
      "/admissions/ghost/stage",
      Some(json!({ "stage": "closed_lost" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("ghost"));
  }

  // ── Reference data ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn facilities_create_and_list() {
    let store = make_store().await;
    let resp = send(
      store.clone(),
      "POST",
      "/facilities",
      Some(json!({ "name": "North campus" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(store, "GET", "/facilities", None).await;
    let facilities: Vec<Facility> = json_body(resp).await;
    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0].name, "North campus");
  }

  #[tokio::test]
  async fn blank_employee_name_returns_400() {
    let resp = send(
      make_store().await,
      "POST",
      "/employees",
      Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
