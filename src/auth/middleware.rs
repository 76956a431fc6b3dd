//! Axum state and credential extraction.

use super::protocol::AuthProtocol;
use crate::config::Config;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthProtocol>,
    pub config: Arc<Config>,
}

/// Session credential presented by the client, if any.
///
/// Read from `Authorization: Bearer {token}` first, then from the session
/// cookie. Never rejects: a missing credential is `None`, and whether a
/// present one is valid is the protocol's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential(pub Option<String>);

impl SessionCredential {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for SessionCredential {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_value(&parts.headers, &state.config.cookie_name));
        Ok(SessionCredential(token))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Find `name` across every `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(config: &Config, token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        config.cookie_name,
        token,
        config.session_ttl_secs,
        if config.cookie_secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value telling the browser to drop the session cookie.
pub fn cleared_cookie(config: &Config) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        config.cookie_name,
        if config.cookie_secure { "; Secure" } else { "" }
    )
}
