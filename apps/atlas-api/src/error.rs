//! Error types for the atlas API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use incentive_engine::error::EngineError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Caller errors about jurisdiction identity all render as
            // not-found; they are expected traffic, never retried.
            ApiError::Engine(
                EngineError::InvalidJurisdiction(_)
                | EngineError::UnknownJurisdiction(_)
                | EngineError::JurisdictionMismatch { .. },
            ) => {
                tracing::debug!("jurisdiction lookup rejected: {}", self);
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
            ApiError::Engine(EngineError::DataSourceUnavailable(e)) => {
                tracing::error!("reference data source unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "reference data temporarily unavailable".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
