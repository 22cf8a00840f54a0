//! Handlers for `/admissions` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/admissions` | Full unfiltered list |
//! | `POST`  | `/admissions` | Body: [`NewAdmission`]; returns 201 + stored record, 400 for an unknown facility |
//! | `GET`   | `/admissions/:id` | 404 if not found |
//! | `PATCH` | `/admissions/:id/stage` | Body: `{"stage":"consultation"}`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use intake_core::{
  AdmissionId, AdmissionRecord, AdmissionRepository, NewAdmission, Stage,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /admissions`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<AdmissionRecord>>, ApiError>
where
  S: AdmissionRepository,
{
  let records = store.list_admissions().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /admissions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<AdmissionId>,
) -> Result<Json<AdmissionRecord>, ApiError>
where
  S: AdmissionRepository,
{
  let record = store
    .get_admission(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("admission {id} not found")))?;
  Ok(Json(record))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /admissions` — returns 201 + the stored [`AdmissionRecord`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAdmission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AdmissionRepository,
{
  body.validate()?;
  let record = store.create_admission(body).await.map_err(ApiError::store)?;
  tracing::info!(id = %record.id, "admission created");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Stage update ─────────────────────────────────────────────────────────────

/// Body of `PATCH /admissions/:id/stage`. Unknown stage keys fail to
/// deserialise and are rejected before reaching the store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StageBody {
  pub stage: Stage,
}

/// `PATCH /admissions/:id/stage` — returns the updated record, or 404 if the
/// store does not know `id`.
pub async fn update_stage<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<AdmissionId>,
  Json(body): Json<StageBody>,
) -> Result<Json<AdmissionRecord>, ApiError>
where
  S: AdmissionRepository,
{
  let record = store
    .update_admission_stage(&id, body.stage)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(%id, stage = %record.stage, "admission stage updated");
  Ok(Json(record))
}
