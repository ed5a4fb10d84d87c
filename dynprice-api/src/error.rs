use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dynprice_core::{BatchError, PricingError, ValidationError};
use serde_json::json;

/// HTTP-facing error. Validation problems are the caller's fault (400);
/// scoring problems are ours (500). The pricing core never defaults a price,
/// so every failure surfaces here.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Scoring(String),
    Internal(anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::Validation(e) => AppError::Validation(e.to_string()),
            PricingError::Scoring(e) => AppError::Scoring(e.to_string()),
        }
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err.source {
            PricingError::Validation(_) => AppError::Validation(err.to_string()),
            PricingError::Scoring(_) => AppError::Scoring(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Scoring(msg) => {
                tracing::error!("scoring failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Internal(err) => {
                tracing::error!("internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}
