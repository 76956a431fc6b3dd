//! Background sweep of expired challenges and sessions.
//!
//! Expiry is already enforced on every lookup, so this job never affects who
//! is logged in. It only returns memory held by challenges nobody redeemed and
//! sessions nobody presented again.

use crate::auth::AuthProtocol;
use std::sync::Arc;
use std::time::Duration;

/// Run the cleanup loop.
///
/// Purges expired entries every `interval`, forever.
pub async fn run_cleanup_loop(auth: Arc<AuthProtocol>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        sweep(&auth);
    }
}

/// Purge once. Returns `(challenges, sessions)` removed.
pub fn sweep(auth: &AuthProtocol) -> (usize, usize) {
    let (challenges, sessions) = auth.purge_expired();

    if challenges > 0 || sessions > 0 {
        tracing::info!(
            action = "cleanup",
            challenges = challenges,
            sessions = sessions,
            pending = auth.pending_challenges(),
            "Cleanup job completed"
        );
    }

    (challenges, sessions)
}
