use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure surfaced at the request boundary
///
/// Handlers never recover from these; they bubble up with `?` and are turned
/// into a 500 response here.
#[derive(Debug)]
pub enum ApiError {
    /// The key-value store rejected a put or get
    Store(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Store(err) => {
                tracing::error!("Key-value store operation failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Key-value store error: {:#}", err),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Store(err)
    }
}
