/*
 * Responsibility
 * - App-wide AppError definition
 * - IntoResponse implementation (HTTP status / JSON error body)
 * - Unified conversion from resolver / config errors
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::session::Rejected;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Request is not authenticated. Always surfaced with the same
    /// generic body regardless of what failed internally.
    #[error("unauthorized")]
    Unauthorized,
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("startup failure: {0}")]
    Startup(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),
            // Config/startup errors never reach a live request path; map
            // them like any other internal failure if one ever does.
            AppError::Config(_) | AppError::Startup(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<Rejected> for AppError {
    fn from(_: Rejected) -> Self {
        AppError::Unauthorized
    }
}
