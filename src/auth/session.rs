//! Token and nonce generation for authentication.

use base64::{engine::general_purpose, Engine as _};
use rand::Rng;

/// Random bytes behind every session token (256 bits).
const SESSION_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random session token.
///
/// Returns an unpadded URL-safe base64 string (43 characters) from 32 random
/// bytes, safe to carry in a cookie or a bearer header as-is.
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rng.fill(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically random challenge nonce.
///
/// Returns `len` random bytes rendered as lowercase hex (`2 * len` characters).
pub fn generate_challenge_nonce(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill(bytes.as_mut_slice());
    hex::encode(bytes)
}
