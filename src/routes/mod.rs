//! API route handlers.

pub mod auth;

use crate::auth::middleware::AppState;
use axum::{routing::get, routing::post, Router};

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/login-challenge", get(auth::login_challenge))
        .route("/login-verify", post(auth::login_verify))
        .route("/profile", get(auth::profile))
        .route("/logout", post(auth::logout))
}
