//! Core identities and wire structures.

use murmur_crypto::box_crypto::BOX_OVERHEAD;
use murmur_crypto::dead_drop::{DeadDrop, DEAD_DROP_SIZE};
use x25519_dalek::{PublicKey, StaticSecret};

/// Fixed plaintext frame size. Every round carries exactly one frame so
/// traffic is uniform whether or not anyone is typing.
pub const SIZE_MESSAGE: usize = 240;

/// Sealed frame size: plaintext plus AEAD tag.
pub const SIZE_ENCRYPTED_MESSAGE: usize = SIZE_MESSAGE + BOX_OVERHEAD;

/// Wire size of a marshalled [`ConvoExchange`].
pub const SIZE_CONVO_EXCHANGE: usize = DEAD_DROP_SIZE + SIZE_ENCRYPTED_MESSAGE;

/// Key material for one conversation. Immutable for the conversation's
/// lifetime; starting over with a new peer means a new identity.
#[derive(Clone)]
pub struct PeerIdentity {
    pub my_public: PublicKey,
    pub my_secret: StaticSecret,
    pub peer_public: PublicKey,
}

impl PeerIdentity {
    pub fn new(my_secret: StaticSecret, peer_public: PublicKey) -> Self {
        let my_public = PublicKey::from(&my_secret);
        Self { my_public, my_secret, peer_public }
    }
}

/// One round's submission to the mix chain.
#[derive(Clone, Debug)]
pub struct ConvoRequest {
    pub round: u32,
    pub onion: Vec<u8>,
}

/// The mix chain's answer for a round.
#[derive(Clone, Debug)]
pub struct ConvoResponse {
    pub round: u32,
    pub onion: Vec<u8>,
}

/// Innermost onion payload: where to rendezvous and what to leave there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvoExchange {
    pub dead_drop: DeadDrop,
    pub encrypted_message: [u8; SIZE_ENCRYPTED_MESSAGE],
}

impl ConvoExchange {
    pub fn marshal(&self) -> [u8; SIZE_CONVO_EXCHANGE] {
        let mut out = [0u8; SIZE_CONVO_EXCHANGE];
        out[..DEAD_DROP_SIZE].copy_from_slice(self.dead_drop.as_bytes());
        out[DEAD_DROP_SIZE..].copy_from_slice(&self.encrypted_message);
        out
    }

    /// Length must be exactly [`SIZE_CONVO_EXCHANGE`].
    pub fn unmarshal(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != SIZE_CONVO_EXCHANGE {
            return None;
        }
        let mut dead_drop = [0u8; DEAD_DROP_SIZE];
        dead_drop.copy_from_slice(&bytes[..DEAD_DROP_SIZE]);
        let mut encrypted_message = [0u8; SIZE_ENCRYPTED_MESSAGE];
        encrypted_message.copy_from_slice(&bytes[DEAD_DROP_SIZE..]);
        Some(Self { dead_drop: DeadDrop(dead_drop), encrypted_message })
    }
}
