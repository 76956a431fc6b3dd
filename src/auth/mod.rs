//! Wallet challenge-response authentication and session management.

pub mod challenge;
pub mod identity;
pub mod middleware;
pub mod protocol;
pub mod session;
pub mod verify;

pub use challenge::{render_challenge, ChallengeIssuer, CHALLENGE_PREFIX};
pub use identity::Identity;
pub use middleware::{AppState, SessionCredential};
pub use protocol::{AuthProtocol, LogoutOutcome, SessionStatus};
pub use session::{generate_challenge_nonce, generate_session_token};
pub use verify::{EthereumVerifier, SignatureVerifier};
