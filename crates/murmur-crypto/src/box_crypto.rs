//! Authenticated encryption between two long-term X25519 keypairs.
//!
//! NaCl-box style: a static-static Diffie-Hellman exchange is expanded with
//! HKDF-SHA256 into a symmetric key, and messages are sealed under
//! XChaCha20-Poly1305 with a caller-supplied 24-byte nonce. Both peers derive
//! the same [`SharedSecret`], so either side can open what the other sealed.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use sha2::Sha256;
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::nonce::NONCE_SIZE;

/// Bytes the AEAD adds to every sealed message (Poly1305 tag).
pub const BOX_OVERHEAD: usize = 16;

const KDF_INFO_BOX: &[u8] = b"murmur_box_v1_key";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoxError {
    #[error("encryption failed")]
    EncryptFailed,
    #[error("decryption failed")]
    DecryptFailed,
}

/// Symmetric key derived once per conversation and reused for every round.
///
/// Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Derive the conversation key from our secret and the peer's public key.
    ///
    /// `precompute(a_secret, b_public) == precompute(b_secret, a_public)`.
    pub fn precompute(my_secret: &StaticSecret, their_public: &PublicKey) -> Self {
        let dh = my_secret.diffie_hellman(their_public);
        Self(derive_key(dh.as_bytes(), KDF_INFO_BOX))
    }

    pub(crate) fn from_raw(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encrypt and authenticate `plaintext`. Output is
    /// `plaintext.len() + BOX_OVERHEAD` bytes.
    pub fn seal(&self, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>, BoxError> {
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&self.0));
        cipher
            .encrypt(XNonce::from_slice(nonce), plaintext)
            .map_err(|_| BoxError::EncryptFailed)
    }

    /// Decrypt and verify a sealed message. Fails if the ciphertext was
    /// tampered with or sealed under a different key or nonce.
    pub fn open(&self, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>, BoxError> {
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&self.0));
        cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| BoxError::DecryptFailed)
    }
}

pub(crate) fn derive_key(ikm: &[u8], info: &[u8]) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut key = [0u8; 32];
    hk.expand(info, &mut key).expect("hkdf expand"); // 32 bytes is always valid
    key
}
