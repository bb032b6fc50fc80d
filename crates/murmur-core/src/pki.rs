//! Mix-chain key directory.

use x25519_dalek::PublicKey;

/// Source of the mix chain's public keys, in hop order (first entry is the
/// entry server). The engine asks once per round so a rotating directory can
/// swap keys between rounds.
pub trait Pki: Send + Sync {
    fn server_keys(&self) -> Vec<PublicKey>;
}

/// Fixed key list, for tests and statically configured deployments.
pub struct StaticPki {
    keys: Vec<PublicKey>,
}

impl StaticPki {
    pub fn new(keys: Vec<PublicKey>) -> Self {
        Self { keys }
    }
}

impl Pki for StaticPki {
    fn server_keys(&self) -> Vec<PublicKey> {
        self.keys.clone()
    }
}
