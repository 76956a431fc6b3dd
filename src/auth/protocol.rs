//! Two-phase wallet sign-in.
//!
//! Per identity: `NoChallenge → ChallengeIssued → (Verified | Rejected)`.
//!
//! 1. [`AuthProtocol::begin_login`] stores a fresh nonce for the identity and
//!    returns the message to sign. Calling it again replaces the nonce.
//! 2. [`AuthProtocol::complete_login`] removes the nonce *before* checking the
//!    signature, so each challenge gets exactly one verification attempt
//!    whatever its outcome. On success a session is created.
//!
//! Sessions are then independent of the nonce state: [`AuthProtocol::check_session`]
//! only reads, [`AuthProtocol::logout`] always succeeds.

use super::challenge::{render_challenge, ChallengeIssuer};
use super::identity::Identity;
use super::verify::SignatureVerifier;
use crate::error::AuthError;
use crate::storage::{NonceStore, SessionStore};
use std::sync::Arc;

/// Result of a session check. Never an error: a bad credential is just logged out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub identity: Option<Identity>,
}

impl SessionStatus {
    fn anonymous() -> Self {
        Self {
            logged_in: false,
            identity: None,
        }
    }
}

/// What the transport must do after a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// A credential was presented and the client should discard it.
    pub clear_credential: bool,
}

/// Sign-in orchestrator over explicitly constructed stores.
pub struct AuthProtocol {
    issuer: ChallengeIssuer,
    nonces: NonceStore,
    sessions: SessionStore,
    verifier: Arc<dyn SignatureVerifier>,
}

impl AuthProtocol {
    pub fn new(
        issuer: ChallengeIssuer,
        nonces: NonceStore,
        sessions: SessionStore,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            issuer,
            nonces,
            sessions,
            verifier,
        }
    }

    /// Issue a challenge for `address` and return the message to sign.
    pub fn begin_login(&self, address: &str) -> Result<String, AuthError> {
        self.issuer.issue(&self.nonces, address)
    }

    /// Redeem the outstanding challenge for `address` with `signature`.
    ///
    /// Returns the new session token on success.
    pub fn complete_login(&self, address: &str, signature: &str) -> Result<String, AuthError> {
        let identity = Identity::parse(address)?;

        // Consumed up front: a failed attempt burns the challenge too
        let nonce = self
            .nonces
            .take_and_clear(&identity)
            .ok_or(AuthError::ChallengeNotFound)?;
        let challenge = render_challenge(&nonce);

        let recovered = self.verifier.verify(&identity, &challenge, signature)?;
        if recovered != identity {
            return Err(AuthError::SignatureMismatch);
        }

        Ok(self.sessions.create(identity))
    }

    /// Report whether `token` names a live session.
    pub fn check_session(&self, token: Option<&str>) -> SessionStatus {
        match token.and_then(|t| self.sessions.lookup(t)) {
            Some(session) => SessionStatus {
                logged_in: true,
                identity: Some(session.identity),
            },
            None => SessionStatus::anonymous(),
        }
    }

    /// End the session named by `token`, if any.
    ///
    /// Any presented credential is to be cleared, live or not. With no
    /// credential there is nothing for the client to drop.
    pub fn logout(&self, token: Option<&str>) -> LogoutOutcome {
        if let Some(token) = token {
            self.sessions.destroy(token);
        }
        LogoutOutcome {
            clear_credential: token.is_some(),
        }
    }

    /// Drop expired challenges and sessions. Returns `(challenges, sessions)` removed.
    pub fn purge_expired(&self) -> (usize, usize) {
        (self.nonces.purge_expired(), self.sessions.purge_expired())
    }

    pub fn pending_challenges(&self) -> usize {
        self.nonces.len()
    }
}
