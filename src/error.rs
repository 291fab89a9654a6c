use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IoError")]
    Io(#[from] std::io::Error),
    #[error("SerdeError")]
    Serde(#[from] serde_json::Error),
    #[error("InvalidDocument: {0}")]
    InvalidDocument(String),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("StoreError")]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// The full error chain goes back to the caller, storage internals included.
impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %crate::unpack_error(&self), "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: crate::unpack_error(&self),
            }),
        )
            .into_response()
    }
}
