//! Handlers for the `/facilities` and `/employees` lookup endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use intake_core::{AdmissionRepository, Employee, Facility};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of `POST /facilities` and `POST /employees`.
#[derive(Debug, Serialize, Deserialize)]
pub struct NamedBody {
  pub name: String,
}

impl NamedBody {
  fn into_name(self) -> Result<String, ApiError> {
    if self.name.trim().is_empty() {
      return Err(ApiError::BadRequest("name must not be blank".into()));
    }
    Ok(self.name)
  }
}

/// `GET /facilities`
pub async fn list_facilities<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Facility>>, ApiError>
where
  S: AdmissionRepository,
{
  Ok(Json(store.list_facilities().await.map_err(ApiError::store)?))
}

/// `POST /facilities` — body: `{"name":"North campus"}`
pub async fn create_facility<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AdmissionRepository,
{
  let facility = store
    .create_facility(body.into_name()?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(facility)))
}

/// `GET /employees`
pub async fn list_employees<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: AdmissionRepository,
{
  Ok(Json(store.list_employees().await.map_err(ApiError::store)?))
}

/// `POST /employees` — body: `{"name":"Mai"}`
pub async fn create_employee<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AdmissionRepository,
{
  let employee = store
    .create_employee(body.into_name()?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(employee)))
}
