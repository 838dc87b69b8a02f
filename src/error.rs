use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Errors surfaced by the rating accessor, the predictor and the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database not configured")]
    StoreUnavailable,

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Invalid probabilities computed")]
    InvalidComputation,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("malformed upload: {0}")]
    Upload(#[from] MultipartError),

    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),

    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::StoreUnavailable | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidComputation => StatusCode::BAD_REQUEST,
            AppError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Rejections keep the status axum assigns them (413 for oversized bodies).
            AppError::Upload(e) => e.status(),
            AppError::Json(e) => e.status(),
            AppError::Query(e) => e.status(),
            AppError::Multipart(e) => e.status(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let body = Json(ErrorBody {
            error: status.to_string(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_are_server_errors() {
        assert_eq!(AppError::StoreUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Store(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn computation_error_is_client_error() {
        assert_eq!(AppError::InvalidComputation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidComputation.to_string(), "Invalid probabilities computed");
    }

    #[test]
    fn missing_upload_field_is_unprocessable() {
        let err = AppError::MissingField("file");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "missing required field `file`");
    }
}
