pub mod auth;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;

use auth::{AppState, AuthProtocol, ChallengeIssuer, EthereumVerifier};
use config::Config;
use std::sync::Arc;
use storage::{NonceStore, SessionStore};
use tower_http::cors::CorsLayer;

/// Build the shared state from configuration: fresh stores, secp256k1 verifier.
pub fn build_state(config: Config) -> AppState {
    let auth = AuthProtocol::new(
        ChallengeIssuer::new(config.nonce_bytes),
        NonceStore::new(config.challenge_ttl_secs, config.max_pending_challenges),
        SessionStore::new(config.session_ttl_secs),
        Arc::new(EthereumVerifier),
    );

    AppState {
        auth: Arc::new(auth),
        config: Arc::new(config),
    }
}

/// Build the full application: API routes, CORS, security headers.
pub fn app(state: AppState) -> axum::Router {
    routes::api_router()
        .layer(cors_layer(&state.config))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .with_state(state)
}

/// With no configured origin, CORS preflights are rejected and only
/// same-origin callers can use the API.
fn cors_layer(config: &Config) -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    match config
        .cors_origin
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        None => CorsLayer::new(),
    }
}
