//! Request and response models for the API.
//!
//! Field names on the wire match what the browser client already sends and
//! reads (`address`, `isLoggedIn`).

use crate::auth::Identity;
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Query for `GET /login-challenge`.
#[derive(Debug, Deserialize)]
pub struct ChallengeQuery {
    #[serde(default)]
    pub address: String,
}

/// Response containing the exact message to sign.
#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub message: String,
}

/// Request to verify a signed challenge.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub address: String,
    pub signature: String, // 0x-prefixed hex, 65 bytes
}

/// Response after successful verification.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// Response for `GET /profile`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

/// The only profile data kept: the authenticated address.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub address: Identity,
}

/// Response after logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Storage Models
// ============================================================================

/// Session record, owned by the session store. Clients only ever hold the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub identity: Identity,
    pub created_at: u64,
}
