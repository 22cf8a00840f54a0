//! Error types for `intake-core`.

use thiserror::Error;

use crate::{AdmissionId, FacilityId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("admission not found: {0}")]
  AdmissionNotFound(AdmissionId),

  #[error("unknown pipeline stage: {0:?}")]
  UnknownStage(String),

  #[error("required field is blank: {0}")]
  BlankField(&'static str),

  #[error("unknown facility: {0}")]
  UnknownFacility(FacilityId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse category of a repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The addressed record does not exist.
  NotFound,
  /// The caller supplied input the store refuses.
  InvalidInput,
  /// Anything else: I/O, database or transport failures.
  Internal,
}

/// Error type of an [`AdmissionRepository`](crate::AdmissionRepository).
pub trait RepositoryError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

impl RepositoryError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::AdmissionNotFound(_) => ErrorKind::NotFound,
      Self::UnknownStage(_) | Self::BlankField(_) | Self::UnknownFacility(_) => {
        ErrorKind::InvalidInput
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_records_and_bad_input_are_classified() {
    assert_eq!(Error::AdmissionNotFound("a".into()).kind(), ErrorKind::NotFound);
    assert_eq!(Error::BlankField("name").kind(), ErrorKind::InvalidInput);
    assert_eq!(Error::UnknownFacility("f".into()).kind(), ErrorKind::InvalidInput);
  }
}
