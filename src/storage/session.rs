//! In-memory session records.
//!
//! Token → `{identity, created_at}`. Sessions expire a fixed TTL after
//! creation. Expiry is enforced when a token is looked up; an expired record
//! found that way is evicted on the spot. `purge_expired` exists only to bound
//! memory and is never needed for correctness.

use super::clock::{Clock, SystemClock};
use crate::auth::session::generate_session_token;
use crate::auth::Identity;
use crate::models::StoredSession;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Token-keyed session store.
pub struct SessionStore {
    sessions: DashMap<String, StoredSession>,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_clock(ttl_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_secs,
            clock,
        }
    }

    /// Create a session bound to `identity` and return its opaque token.
    pub fn create(&self, identity: Identity) -> String {
        let created_at = self.clock.now_secs();
        loop {
            let token = generate_session_token();
            // Never overwrite a live session
            if let Entry::Vacant(slot) = self.sessions.entry(token.clone()) {
                slot.insert(StoredSession {
                    identity,
                    created_at,
                });
                return token;
            }
        }
    }

    /// Look up a live session.
    ///
    /// Unknown tokens and sessions older than the TTL both come back `None`.
    pub fn lookup(&self, token: &str) -> Option<StoredSession> {
        let now = self.clock.now_secs();
        let session = self.sessions.get(token).map(|s| s.value().clone())?;

        if self.is_expired(&session, now) {
            self.sessions
                .remove_if(token, |_, stored| self.is_expired(stored, now));
            return None;
        }

        Some(session)
    }

    /// Remove a session. Unknown tokens are not an error.
    ///
    /// Returns true if a session was removed.
    pub fn destroy(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_secs();
        let mut purged = 0;
        self.sessions.retain(|_, session| {
            let keep = !self.is_expired(session, now);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    /// Number of stored sessions, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, session: &StoredSession, now: u64) -> bool {
        now.saturating_sub(session.created_at) > self.ttl_secs
    }
}
