use thiserror::Error;

/// Round processing failures. None are fatal to the conversation: the engine
/// logs the round and moves on, and the next heartbeat round re-establishes
/// liveness.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvoError {
    /// A decrypted frame carried an unknown discriminant byte.
    #[error("unexpected message type: {0}")]
    MalformedMessage(u8),

    /// Queued text exceeds the fixed frame capacity.
    #[error("text message too long: {0} bytes")]
    MessageTooLong(usize),

    /// A response arrived for a round we never sent (or already handled).
    #[error("round {0} not found")]
    RoundNotFound(u32),

    /// The response onion did not unwind with the keys saved at send time.
    #[error("decrypting onion failed")]
    OnionDecryptionFailed,

    /// The dead-drop contents did not open under the peer's round nonce.
    #[error("decrypting peer message failed")]
    MessageDecryptionFailed,

    #[error("sealing message failed")]
    EncryptionFailed,
}
