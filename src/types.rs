// Error taxonomy shared by the media endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required fields: folder and public_id")]
    MissingFields,

    #[error("Unauthorized folder")]
    UnauthorizedFolder,

    #[error("Failed to generate signature: {0}")]
    SigningFailure(String),

    #[error("Missing public_id")]
    MissingPublicId,

    #[error("Can only delete from gallery folder")]
    ForbiddenPath,

    /// The storage service answered, but not with `"ok"`.
    #[error("Failed to delete image: {0}")]
    DeletionRejected(serde_json::Value),

    /// The destroy call itself failed.
    #[error("Failed to delete image: {0}")]
    DeletionFailure(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields
            | ApiError::MissingPublicId
            | ApiError::DeletionRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::UnauthorizedFolder | ApiError::ForbiddenPath => StatusCode::FORBIDDEN,
            ApiError::SigningFailure(_) | ApiError::DeletionFailure(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// JSON body sent to the caller. Signing failures stay generic, deletion
    /// failures carry the underlying message.
    pub fn body(&self) -> serde_json::Value {
        match self {
            ApiError::SigningFailure(_) => json!({ "error": "Failed to generate signature" }),
            ApiError::DeletionRejected(details) => json!({
                "error": "Failed to delete image",
                "details": details,
            }),
            ApiError::DeletionFailure(message) => json!({
                "error": "Failed to delete image",
                "message": message,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
