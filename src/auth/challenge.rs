//! Challenge message construction.
//!
//! The message is rebuilt from the stored nonce at verification time. Changing
//! [`CHALLENGE_PREFIX`] invalidates every outstanding challenge.

use super::identity::Identity;
use super::session::generate_challenge_nonce;
use crate::error::AuthError;
use crate::storage::NonceStore;

/// Fixed text every challenge starts with. The hex nonce follows directly.
pub const CHALLENGE_PREFIX: &str =
    "Please sign this message to log in to the Decentralized Job Platform. Nonce: ";

/// Default nonce size in bytes.
pub const DEFAULT_NONCE_BYTES: usize = 32;

/// Smallest nonce size accepted (256 bits of entropy).
pub const MIN_NONCE_BYTES: usize = 32;

/// Render the exact text a wallet must sign for `nonce_hex`.
pub fn render_challenge(nonce_hex: &str) -> String {
    format!("{}{}", CHALLENGE_PREFIX, nonce_hex)
}

/// Issues fresh challenges and records their nonces.
#[derive(Debug, Clone)]
pub struct ChallengeIssuer {
    nonce_bytes: usize,
}

impl Default for ChallengeIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_BYTES)
    }
}

impl ChallengeIssuer {
    /// Nonce sizes below [`MIN_NONCE_BYTES`] are raised to it.
    pub fn new(nonce_bytes: usize) -> Self {
        Self {
            nonce_bytes: nonce_bytes.max(MIN_NONCE_BYTES),
        }
    }

    pub fn nonce_bytes(&self) -> usize {
        self.nonce_bytes
    }

    /// Issue a challenge for `address`, replacing any outstanding one.
    ///
    /// An invalid address is rejected before the store is touched.
    pub fn issue(&self, nonces: &NonceStore, address: &str) -> Result<String, AuthError> {
        let identity = Identity::parse(address)?;
        let nonce = generate_challenge_nonce(self.nonce_bytes);
        let message = render_challenge(&nonce);
        nonces.put(identity, nonce);
        Ok(message)
    }
}
