//! Error types for the Boardwatch HTTP API.
//!
//! [`ApiError`] unifies request failures into a single enum that renders
//! as a JSON error body via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. A bad
//! request only ever fails that request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boardwatch_core::RegistryError;

/// Errors that can occur while handling an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `id` query parameter is missing or empty.
    #[error("missing game id: pass ?id=<game>")]
    MissingGameId,

    /// The request body could not be decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// The referenced game does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with the game's current state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RegistryError::EmptyLog { .. } => Self::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingGameId | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
