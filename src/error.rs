//! Error types and Axum response conversions.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures of the sign-in handshake.
///
/// Every variant is recoverable by restarting from a fresh challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The claimed address is empty or not a plausible address.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No outstanding challenge: never issued, overwritten, expired, or already used.
    #[error("challenge not found")]
    ChallengeNotFound,

    /// The signature could not be parsed or no key could be recovered from it.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The signature is well formed but was produced by a different key.
    #[error("signature does not match the claimed address")]
    SignatureMismatch,
}

/// Application error types.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Internal(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => AppError::BadRequest(msg),
            AuthError::ChallengeNotFound => AppError::BadRequest(
                "Invalid or expired challenge. Please try again.".to_string(),
            ),
            // Parse details stay server-side
            AuthError::MalformedSignature(_) | AuthError::SignatureMismatch => {
                AppError::Unauthorized("Signature verification failed.".to_string())
            }
        }
    }
}
