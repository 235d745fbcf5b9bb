//! Store operation errors.

use stockroom_core::DomainError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
///
/// These are infrastructure failures (missing records, contract misuse,
/// backend faults) as opposed to domain validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A strict `single` fetch or an update targeted a record that does not
    /// exist.
    #[error("document not found")]
    NotFound,

    /// A `single`/`single_or_default` query matched more than one document.
    #[error("query matched more than one document")]
    NotSingle,

    /// Backend fault; the message is preserved for the caller.
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => DomainError::NotFound,
            other => DomainError::store(other.to_string()),
        }
    }
}
