//! Outstanding sign-in challenges, one per identity.
//!
//! Entries live only for the life of the process. A restart drops every
//! outstanding challenge, and the client simply asks for a new one.
//!
//! ## Concurrency
//!
//! Backed by a sharded `DashMap`, so requests for different identities do not
//! serialize behind a global lock. `take_and_clear` is a single `remove`:
//! of any number of concurrent callers for the same identity, at most one
//! receives the nonce.

use super::clock::{Clock, SystemClock};
use crate::auth::Identity;
use dashmap::DashMap;
use std::sync::Arc;
use zeroize::Zeroizing;

struct PendingChallenge {
    nonce: Zeroizing<String>,
    issued_at: u64,
}

/// In-memory store mapping an identity to its single outstanding nonce.
pub struct NonceStore {
    entries: DashMap<Identity, PendingChallenge>,
    /// Seconds a challenge stays redeemable; 0 means no limit.
    ttl_secs: u64,
    /// Soft cap on outstanding challenges.
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl NonceStore {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self::with_clock(ttl_secs, max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl_secs: u64, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs,
            max_entries: max_entries.max(1),
            clock,
        }
    }

    /// Store `nonce` as the outstanding challenge for `identity`.
    ///
    /// Any previous nonce for the same identity is overwritten and can no
    /// longer be redeemed. When the store is full, expired entries are purged
    /// and, failing that, the oldest outstanding challenge is evicted.
    pub fn put(&self, identity: Identity, nonce: String) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&identity) {
            self.purge_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }

        self.entries.insert(
            identity,
            PendingChallenge {
                nonce: Zeroizing::new(nonce),
                issued_at: self.clock.now_secs(),
            },
        );
    }

    /// Remove and return the outstanding nonce for `identity`.
    ///
    /// The entry is gone once this returns, whether or not it is handed back:
    /// an expired challenge is removed and reported as absent.
    pub fn take_and_clear(&self, identity: &Identity) -> Option<Zeroizing<String>> {
        let (_, pending) = self.entries.remove(identity)?;
        if self.is_expired(pending.issued_at, self.clock.now_secs()) {
            return None;
        }
        Some(pending.nonce)
    }

    /// Drop every expired challenge. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        if self.ttl_secs == 0 {
            return 0;
        }
        let now = self.clock.now_secs();
        let mut purged = 0;
        self.entries.retain(|_, pending| {
            let keep = !self.is_expired(pending.issued_at, now);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    /// Number of outstanding challenges.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, issued_at: u64, now: u64) -> bool {
        self.ttl_secs > 0 && now.saturating_sub(issued_at) > self.ttl_secs
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().issued_at)
            .map(|entry| entry.key().clone());

        if let Some(identity) = oldest {
            self.entries.remove(&identity);
            tracing::debug!(action = "challenge_evicted", identity = %identity, "Nonce store full");
        }
    }
}
