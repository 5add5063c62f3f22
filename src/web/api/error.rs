use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::heatmap::{GenerateError, HeatmapError};
use crate::store::StorageError;

pub enum ApiError {
    Validation(String),
    NotFound(String),
    InsufficientData(String),
    Storage(StorageError),
    Render(HeatmapError),
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(id) => ApiError::NotFound(id),
            StorageError::InvalidFilter(_) => ApiError::Validation(e.to_string()),
            _ => ApiError::Storage(e),
        }
    }
}

impl From<HeatmapError> for ApiError {
    fn from(e: HeatmapError) -> Self {
        match e {
            HeatmapError::InsufficientData { .. } => ApiError::InsufficientData(e.to_string()),
            _ => ApiError::Render(e),
        }
    }
}

impl From<GenerateError<StorageError>> for ApiError {
    fn from(e: GenerateError<StorageError>) -> Self {
        match e {
            GenerateError::Source(e) => e.into(),
            GenerateError::Heatmap(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message("transmitter_not_found", &id)),
            )
                .into_response(),
            ApiError::InsufficientData(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::with_message("insufficient_data", &msg)),
            )
                .into_response(),
            ApiError::Storage(e) => {
                log::error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_message("storage_error", &e.to_string())),
                )
                    .into_response()
            }
            ApiError::Render(e) => {
                log::error!("Heatmap failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_message("render_error", &e.to_string())),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("internal_error", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
