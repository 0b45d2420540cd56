//! Application error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result type for report and handler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the report endpoints.
#[derive(Debug, Error)]
pub enum AppError {
    /// Update/delete target missing.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or out-of-domain query parameter. Rejected before any
    /// pipeline is built or executed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// Any failure from the underlying database call, surfaced with the raw
    /// driver message.
    #[error(transparent)]
    Store(#[from] mongodb::error::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": self.to_string() })),
            )
                .into_response(),
            AppError::InvalidParameter { .. } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": self.to_string() })),
            )
                .into_response(),
            AppError::Store(ref e) => {
                tracing::error!(error = %e, "store call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": self.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
