use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures of the forecasting core. Deterministic for a given input, so
/// retrying without changing the input fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    InsufficientData(String),
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ForecastError> for AppError {
    fn from(value: ForecastError) -> Self {
        match value {
            ForecastError::InsufficientData { .. } => AppError::InsufficientData(value.to_string()),
            ForecastError::InvalidArgument(msg) => AppError::Validation(msg),
        }
    }
}
