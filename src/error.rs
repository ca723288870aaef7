//! Service layer error type.

use thiserror::Error;
use validator::ValidationErrors;

use crate::{dao::storage::StorageError, share::ShareDecodeError};

/// Failures surfaced by the service layer.
///
/// The live match itself never fails: illegal actions are absorbed by the
/// reducer. These cover setup validation, persistence and sharing.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A store call failed; the live session is untouched.
    #[error("store call failed")]
    Unavailable(#[source] StorageError),
    /// No store is installed, so history and sharing are disabled.
    #[error("no store installed (degraded mode)")]
    Degraded,
    /// Setup, token or player reference rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The live match is not on the screen the operation requires.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// No stored match or shared result under that id.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(format!("match setup rejected: {err}"))
    }
}

impl From<ShareDecodeError> for ServiceError {
    fn from(err: ShareDecodeError) -> Self {
        ServiceError::InvalidInput(format!("invalid share token: {err}"))
    }
}
