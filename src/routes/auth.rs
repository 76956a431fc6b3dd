//! Auth API endpoints.

use crate::auth::middleware::{cleared_cookie, session_cookie, AppState, SessionCredential};
use crate::auth::Identity;
use crate::error::{AppError, AuthError};
use crate::models::{
    ChallengeQuery, ChallengeResponse, LogoutResponse, ProfileResponse, UserInfo, VerifyRequest,
    VerifyResponse,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};

/// Address as it appears in log fields: the normalized identity when the
/// input parses, otherwise the raw input.
fn principal(address: &str) -> String {
    Identity::parse(address)
        .map(|identity| identity.to_string())
        .unwrap_or_else(|_| address.to_string())
}

/// GET /login-challenge?address=...: Issue a message for the wallet to sign
pub async fn login_challenge(
    State(state): State<AppState>,
    Query(query): Query<ChallengeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.auth.begin_login(&query.address)?;

    tracing::info!(action = "challenge_issued", address = %principal(&query.address), "Challenge issued");

    Ok(Json(ChallengeResponse { message }))
}

/// POST /login-verify: Verify signature and create session
pub async fn login_verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let address = principal(&req.address);
    let token = match state.auth.complete_login(&req.address, &req.signature) {
        Ok(token) => token,
        Err(err) => {
            match &err {
                AuthError::MalformedSignature(detail) => {
                    tracing::warn!(action = "auth_failed", address = %address, reason = %detail, "Malformed signature")
                }
                AuthError::SignatureMismatch => {
                    tracing::warn!(action = "auth_failed", address = %address, "Signature does not match address")
                }
                AuthError::ChallengeNotFound => {
                    tracing::info!(action = "auth_failed", address = %address, "No outstanding challenge")
                }
                AuthError::InvalidInput(_) => {}
            }
            return Err(err.into());
        }
    };

    let cookie = HeaderValue::from_str(&session_cookie(&state.config, &token))
        .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))?;

    tracing::info!(action = "auth_success", address = %address, "User authenticated");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(VerifyResponse {
            success: true,
            message: "Login successful!".to_string(),
            token,
        }),
    ))
}

/// GET /profile: Report whether the caller has a live session
pub async fn profile(
    State(state): State<AppState>,
    credential: SessionCredential,
) -> Json<ProfileResponse> {
    let status = state.auth.check_session(credential.token());

    Json(ProfileResponse {
        is_logged_in: status.logged_in,
        user: status.identity.map(|address| UserInfo { address }),
    })
}

/// POST /logout: Invalidate the current session
pub async fn logout(
    State(state): State<AppState>,
    credential: SessionCredential,
) -> Result<impl IntoResponse, AppError> {
    let status = state.auth.check_session(credential.token());
    let outcome = state.auth.logout(credential.token());

    if let Some(identity) = status.identity {
        tracing::info!(action = "logout", address = %identity, "User logged out");
    }

    let body = Json(LogoutResponse {
        success: true,
        message: "Logged out successfully.".to_string(),
    });

    if !outcome.clear_credential {
        return Ok(body.into_response());
    }

    let cookie = HeaderValue::from_str(&cleared_cookie(&state.config))
        .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))?;
    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}
