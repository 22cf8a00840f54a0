//! Async HTTP client wrapping the intake JSON API.
//!
//! [`ApiClient`] implements [`AdmissionRepository`], so the board drives the
//! remote server exactly as it would a local store.

use std::time::Duration;

use intake_core::{
  AdmissionId, AdmissionRecord, AdmissionRepository, Employee, ErrorKind,
  Facility, NewAdmission, RepositoryError, Stage,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("{method} {path} failed: {source}")]
  Transport {
    method: &'static str,
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {path} → {status}: {message}")]
  Status {
    method:  &'static str,
    path:    String,
    status:  StatusCode,
    message: String,
  },
}

impl RepositoryError for ClientError {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Status { status, .. } if *status == StatusCode::NOT_FOUND => ErrorKind::NotFound,
      Self::Status { status, .. } if status.is_client_error() => ErrorKind::InvalidInput,
      _ => ErrorKind::Internal,
    }
  }
}

/// Connection settings for the intake API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the intake JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(ClientError::Build)?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req` and decode a JSON body, turning non-2xx responses into
  /// [`ClientError::Status`] carrying the server's `error` message.
  async fn send<T: DeserializeOwned>(
    &self,
    method: &'static str,
    path: String,
    req: RequestBuilder,
  ) -> Result<T, ClientError> {
    let resp = req.send().await.map_err(|source| ClientError::Transport {
      method,
      path: path.clone(),
      source,
    })?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned());
      return Err(ClientError::Status { method, path, status, message });
    }

    resp
      .json()
      .await
      .map_err(|source| ClientError::Transport { method, path, source })
  }
}

impl AdmissionRepository for ApiClient {
  type Error = ClientError;

  // ── Admissions ────────────────────────────────────────────────────────────

  /// `GET /api/admissions`
  async fn list_admissions(&self) -> Result<Vec<AdmissionRecord>, ClientError> {
    let path = "/admissions".to_owned();
    self.send("GET", path, self.client.get(self.url("/admissions"))).await
  }

  /// `GET /api/admissions/:id`. A 404 becomes `None`.
  async fn get_admission(
    &self,
    id: &AdmissionId,
  ) -> Result<Option<AdmissionRecord>, ClientError> {
    let path = format!("/admissions/{id}");
    match self.send("GET", path.clone(), self.client.get(self.url(&path))).await {
      Ok(record) => Ok(Some(record)),
      Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  /// `POST /api/admissions`
  async fn create_admission(
    &self,
    input: NewAdmission,
  ) -> Result<AdmissionRecord, ClientError> {
    let path = "/admissions".to_owned();
    let req = self.client.post(self.url(&path)).json(&input);
    self.send("POST", path, req).await
  }

  /// `PATCH /api/admissions/:id/stage`
  async fn update_admission_stage(
    &self,
    id: &AdmissionId,
    stage: Stage,
  ) -> Result<AdmissionRecord, ClientError> {
    let path = format!("/admissions/{id}/stage");
    let req = self
      .client
      .patch(self.url(&path))
      .json(&json!({ "stage": stage }));
    self.send("PATCH", path, req).await
  }

  // ── Reference data ────────────────────────────────────────────────────────

  /// `GET /api/facilities`
  async fn list_facilities(&self) -> Result<Vec<Facility>, ClientError> {
    let path = "/facilities".to_owned();
    self.send("GET", path, self.client.get(self.url("/facilities"))).await
  }

  /// `POST /api/facilities`
  async fn create_facility(&self, name: String) -> Result<Facility, ClientError> {
    let path = "/facilities".to_owned();
    let req = self.client.post(self.url(&path)).json(&json!({ "name": name }));
    self.send("POST", path, req).await
  }

  /// `GET /api/employees`
  async fn list_employees(&self) -> Result<Vec<Employee>, ClientError> {
    let path = "/employees".to_owned();
    self.send("GET", path, self.client.get(self.url("/employees"))).await
  }

  /// `POST /api/employees`
  async fn create_employee(&self, name: String) -> Result<Employee, ClientError> {
    let path = "/employees".to_owned();
    let req = self.client.post(self.url(&path)).json(&json!({ "name": name }));
    self.send("POST", path, req).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_base_and_api_prefix() {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://localhost:5240/".into(),
    })
    .unwrap();
    assert_eq!(
      client.url("/admissions/1/stage"),
      "http://localhost:5240/api/admissions/1/stage"
    );
  }

  #[test]
  fn status_errors_are_classified() {
    let status = |status| ClientError::Status {
      method:  "PATCH",
      path:    "/admissions/1/stage".into(),
      status,
      message: String::new(),
    };
    assert_eq!(status(StatusCode::NOT_FOUND).kind(), ErrorKind::NotFound);
    assert_eq!(status(StatusCode::UNPROCESSABLE_ENTITY).kind(), ErrorKind::InvalidInput);
    assert_eq!(status(StatusCode::INTERNAL_SERVER_ERROR).kind(), ErrorKind::Internal);
  }
}
