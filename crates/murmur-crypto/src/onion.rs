//! Layered encryption through a chain of mix servers.
//!
//! Submission path: the client wraps its payload once per hop, innermost
//! layer for the last hop. Each layer is a fresh ephemeral X25519 envelope,
//! `ephemeral_public (32 bytes) || ciphertext`, so hops cannot be linked to
//! the client's long-term key. A hop peels its layer and keeps the shared
//! key it derived; on the response path hops wrap the reply symmetrically in
//! reverse order and the client unwinds with the keys it saved at seal time.
//!
//! All layers of one direction share a nonce seed (see [`crate::nonce`]);
//! key separation comes from the per-hop ephemeral exchanges.

use rand_core::OsRng;
use thiserror::Error;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::ZeroizeOnDrop;

use crate::box_crypto::{derive_key, SharedSecret, BOX_OVERHEAD};
use crate::nonce::NONCE_SIZE;

/// Bytes one onion layer adds: ephemeral public key plus AEAD tag.
pub const LAYER_OVERHEAD: usize = 32 + BOX_OVERHEAD;

const KDF_INFO_ONION: &[u8] = b"murmur_onion_v1_key";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OnionError {
    #[error("onion layer too short")]
    Truncated,
    #[error("sealing onion layer failed")]
    SealFailed,
    #[error("decrypting onion layer failed")]
    OpenFailed,
}

/// Symmetric key one hop shares with the client for a single onion.
///
/// Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct HopSharedKey(SharedSecret);

impl core::fmt::Debug for HopSharedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HopSharedKey(..)")
    }
}

fn hop_key(dh_bytes: &[u8; 32]) -> HopSharedKey {
    HopSharedKey(SharedSecret::from_raw(derive_key(dh_bytes, KDF_INFO_ONION)))
}

/// Client side: wrap `payload` for the chain described by `hop_keys`
/// (first key is the first hop). Returns the onion and the per-hop shared
/// keys in hop order, which [`open`] needs for the response.
pub fn seal(
    payload: &[u8],
    nonce: &[u8; NONCE_SIZE],
    hop_keys: &[PublicKey],
) -> Result<(Vec<u8>, Vec<HopSharedKey>), OnionError> {
    let mut onion = payload.to_vec();
    let mut shared_rev = Vec::with_capacity(hop_keys.len());

    for hop_public in hop_keys.iter().rev() {
        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = PublicKey::from(&ephemeral);
        let key = hop_key(ephemeral.diffie_hellman(hop_public).as_bytes());

        let ciphertext = key.0.seal(nonce, &onion).map_err(|_| OnionError::SealFailed)?;
        let mut layer = Vec::with_capacity(32 + ciphertext.len());
        layer.extend_from_slice(ephemeral_public.as_bytes());
        layer.extend_from_slice(&ciphertext);

        onion = layer;
        shared_rev.push(key);
    }

    shared_rev.reverse();
    Ok((onion, shared_rev))
}

/// Client side: unwind a response onion with the shared keys saved by
/// [`seal`], in the same hop order.
pub fn open(
    onion: &[u8],
    nonce: &[u8; NONCE_SIZE],
    shared_keys: &[HopSharedKey],
) -> Result<Vec<u8>, OnionError> {
    let mut message = onion.to_vec();
    for key in shared_keys {
        message = key.0.open(nonce, &message).map_err(|_| OnionError::OpenFailed)?;
    }
    Ok(message)
}

/// Hop side: strip one submission layer. Returns the inner onion and the
/// shared key this hop must keep for [`wrap_reply`].
pub fn peel(
    hop_secret: &StaticSecret,
    onion: &[u8],
    nonce: &[u8; NONCE_SIZE],
) -> Result<(Vec<u8>, HopSharedKey), OnionError> {
    if onion.len() < LAYER_OVERHEAD {
        return Err(OnionError::Truncated);
    }
    let (ephemeral_bytes, ciphertext) = onion.split_at(32);
    let mut ephemeral = [0u8; 32];
    ephemeral.copy_from_slice(ephemeral_bytes);

    let key = hop_key(hop_secret.diffie_hellman(&PublicKey::from(ephemeral)).as_bytes());
    let inner = key.0.open(nonce, ciphertext).map_err(|_| OnionError::OpenFailed)?;
    Ok((inner, key))
}

/// Hop side: add one response layer under the key saved at [`peel`] time.
pub fn wrap_reply(
    reply: &[u8],
    nonce: &[u8; NONCE_SIZE],
    key: &HopSharedKey,
) -> Result<Vec<u8>, OnionError> {
    key.0.seal(nonce, reply).map_err(|_| OnionError::SealFailed)
}
