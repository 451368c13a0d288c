use thiserror::Error;

use crate::domain::UserId;

/// Errors surfaced by the service and manager layers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(UserId),
    #[error("User validation error: {0}")]
    ValidationError(String),
    /// Raised by `User::new` when the entity itself cannot be built.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Export failed: {0}")]
    ExportError(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Failures talking to a repository. Absence of a record is never an error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepositoryError {
    #[error("Repository actor closed")]
    ActorClosed,
    #[error("Repository actor dropped the request")]
    ActorDropped,
    #[error("No user ids left to assign")]
    IdSequenceExhausted,
}

pub type UserResult<T> = std::result::Result<T, UserError>;
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
