//! Nonce construction for round-keyed encryption.
//!
//! Every nonce embeds the round number, so no two rounds share a nonce.
//! Conversation nonces additionally embed the sender's role byte, keeping
//! the two directions of the same round distinct; onion nonce seeds embed a
//! direction byte instead, separating the forward (submission) and backward
//! (response) paths through the mix chain.

/// Nonce size in bytes (XChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 24;

/// Nonce for a conversation message: round (4 bytes, big-endian) || zeros || role.
pub fn convo_nonce(round: u32, role: u8) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[0..4].copy_from_slice(&round.to_be_bytes());
    nonce[23] = role;
    nonce
}

/// Nonce seed for onion layers on the submission path.
pub fn forward_nonce(round: u32) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[0..4].copy_from_slice(&round.to_be_bytes());
    nonce[4] = 0;
    nonce
}

/// Nonce seed for onion layers on the response path.
pub fn backward_nonce(round: u32) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[0..4].copy_from_slice(&round.to_be_bytes());
    nonce[4] = 1;
    nonce
}
