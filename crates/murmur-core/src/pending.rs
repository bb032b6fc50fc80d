//! Round-keyed pending state.

use std::collections::HashMap;

use murmur_crypto::onion::HopSharedKey;

use crate::types::SIZE_ENCRYPTED_MESSAGE;

/// State bridging a sent request to its eventual response.
pub struct PendingRound {
    /// Per-hop keys returned by the onion seal, in hop order.
    pub onion_shared_keys: Vec<HopSharedKey>,
    /// Exact sealed bytes we submitted, kept for echo detection.
    pub sent_ciphertext: [u8; SIZE_ENCRYPTED_MESSAGE],
}

/// Pending state by round id. Not internally synchronized; the conversation
/// engine guards it with its session lock. Entries whose response never
/// arrives stay until the conversation is dropped, which is acceptable for
/// session-length lifetimes.
#[derive(Default)]
pub struct PendingRounds {
    rounds: HashMap<u32, PendingRound>,
}

impl PendingRounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent round. A duplicate round id replaces the previous entry
    /// and returns it.
    pub fn put(&mut self, round: u32, entry: PendingRound) -> Option<PendingRound> {
        self.rounds.insert(round, entry)
    }

    /// Remove and return the state for a round. Each response consumes its
    /// round exactly once.
    pub fn take(&mut self, round: u32) -> Option<PendingRound> {
        self.rounds.remove(&round)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
