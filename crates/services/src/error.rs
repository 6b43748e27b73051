//! Shared error types for the services crate.

use serde::Serialize;
use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use trivia_core::model::{CategoryId, QuestionError};

/// Underlying cause of a failed operation, before it is classified for clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OperationError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("default category {0} does not exist")]
    MissingDefaultCategory(CategoryId),
    #[error("malformed question payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Errors emitted by `CategoryService` and `QuestionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unprocessable: {0}")]
    Unprocessable(#[source] OperationError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(#[source] OperationError),
}

impl QuestionServiceError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub(crate) fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    pub(crate) fn unprocessable(cause: impl Into<OperationError>) -> Self {
        Self::Unprocessable(cause.into())
    }

    pub(crate) fn internal(cause: impl Into<OperationError>) -> Self {
        Self::Internal(cause.into())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unprocessable(_) => ErrorKind::Unprocessable,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Failure classes handed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unprocessable,
    BadRequest,
    Internal,
}

impl ErrorKind {
    /// HTTP status conventionally used for this failure.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Unprocessable => 422,
            Self::BadRequest => 400,
            Self::Internal => 500,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "Resource not Found",
            Self::Unprocessable => "Unprocessable",
            Self::BadRequest => "Bad Request",
            Self::Internal => "Internal Server Error",
        }
    }
}

/// Serializable failure record: `{"success": false, "error": 404, "message": ".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl From<ErrorKind> for ErrorBody {
    fn from(kind: ErrorKind) -> Self {
        Self {
            success: false,
            error: kind.status(),
            message: kind.message(),
        }
    }
}

impl From<&QuestionServiceError> for ErrorBody {
    fn from(err: &QuestionServiceError) -> Self {
        err.kind().into()
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
