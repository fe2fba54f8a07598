//! Mapping of handler failures to HTTP responses.
//!
//! Every error is rendered as `{"message": ...}` with the status below.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskboard_proto::api::{MessageResponse, NO_TASKS_MESSAGE, TASK_NOT_FOUND_MESSAGE};
use taskboard_proto::validate::ValidationError;

use crate::merge::MergeError;
use crate::store::StoreError;

/// A failed request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The store does not exist, so there is nothing to edit. 404.
    #[error("{}", NO_TASKS_MESSAGE)]
    NoTasks,

    /// No task matches the requested id. 404.
    #[error("{}", TASK_NOT_FOUND_MESSAGE)]
    TaskNotFound,

    /// A touched field violates a validation rule. 400.
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    /// The body could not be understood. 400.
    #[error("{0}")]
    BadRequest(String),

    /// Reading, parsing or writing the store failed. 500, with the
    /// underlying error text as the message.
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NoTasks | Self::TaskNotFound => StatusCode::NOT_FOUND,
            Self::Invalid(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MergeError> for ApiError {
    fn from(e: MergeError) -> Self {
        match e {
            MergeError::Invalid(v) => Self::Invalid(v),
            MergeError::Malformed(msg) => Self::BadRequest(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
