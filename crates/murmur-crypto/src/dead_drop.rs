//! Dead-drop mailbox identifiers.
//!
//! Two peers in conversation rendezvous at a per-round mailbox id derived
//! from their shared secret. The mix chain only ever sees the id, never the
//! keys behind it, and the id changes every round.

use rand_core::{OsRng, RngCore};

use crate::box_crypto::SharedSecret;
use crate::hash::hmac_sha256;

pub const DEAD_DROP_SIZE: usize = 32;

/// Per-round mailbox id on the final mix server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeadDrop(pub [u8; DEAD_DROP_SIZE]);

impl DeadDrop {
    /// Derive the round's mailbox id. Both peers compute the same id because
    /// they hold the same shared secret.
    pub fn derive(secret: &SharedSecret, round: u32) -> Self {
        Self(hmac_sha256(secret.as_bytes(), &round.to_be_bytes()))
    }

    /// Fresh random id. Solo conversations use this so the mailbox is almost
    /// surely unshared and the round echoes our own message back.
    pub fn random() -> Self {
        let mut id = [0u8; DEAD_DROP_SIZE];
        OsRng.fill_bytes(&mut id);
        Self(id)
    }

    pub fn as_bytes(&self) -> &[u8; DEAD_DROP_SIZE] {
        &self.0
    }
}
