//! API request handlers.

mod system;
mod todos;

#[cfg(test)]
mod todos_test;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

pub use system::*;
pub use todos::*;

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    #[schema(example = "Todo '5f1d7c3e9b1e8a0012345678' not found")]
    pub error: String,
}

pub(crate) fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
