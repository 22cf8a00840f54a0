//! Error type for `intake-store-sqlite`.

use intake_core::{AdmissionId, ErrorKind, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] intake_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("admission not found: {0}")]
  AdmissionNotFound(AdmissionId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl RepositoryError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::AdmissionNotFound(_) => ErrorKind::NotFound,
      Self::Database(_) | Self::DateParse(_) => ErrorKind::Internal,
    }
  }
}
