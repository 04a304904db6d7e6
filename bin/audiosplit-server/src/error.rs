//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** Internal errors (storage, registry) are logged with
//! full detail but only a generic message is returned to the caller so
//! that filesystem paths or other implementation details never leak.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use audiosplit_core::{QueryError, StoreError};

/// All errors that can occur in the audiosplit-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request (missing file,
    /// wrong file count, oversized upload, unsupported format).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller referenced a job or artifact that does not exist, or an
    /// artifact that is not yet downloadable.
    #[error("not found: {0}")]
    NotFound(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),

            // Internal errors: log the full detail, return a generic message.
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<QueryError> for ServerError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::UnknownJob(id) => ServerError::NotFound(format!("job {id} not found")),
            QueryError::NotReady(id) => {
                ServerError::NotFound(format!("job {id} is not completed yet"))
            }
            QueryError::UnknownArtifact { name, .. } => {
                ServerError::NotFound(format!("file {name:?} not found"))
            }
            QueryError::Store(e) => ServerError::from(e),
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidName(name) => {
                ServerError::BadRequest(format!("invalid file name: {name:?}"))
            }
            StoreError::NotFound { name, .. } => {
                ServerError::NotFound(format!("file {name:?} not found"))
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}
