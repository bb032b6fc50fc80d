use proptest::prelude::*;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::box_crypto::{SharedSecret, BOX_OVERHEAD};
use crate::dead_drop::DeadDrop;
use crate::nonce::{backward_nonce, convo_nonce, forward_nonce};
use crate::onion;
use crate::utils::constant_time_compare;

fn shared_from_seeds(a_seed: [u8; 32], b_seed: [u8; 32]) -> (SharedSecret, SharedSecret) {
    let a_secret = StaticSecret::from(a_seed);
    let b_secret = StaticSecret::from(b_seed);
    let a_public = PublicKey::from(&a_secret);
    let b_public = PublicKey::from(&b_secret);
    (
        SharedSecret::precompute(&a_secret, &b_public),
        SharedSecret::precompute(&b_secret, &a_public),
    )
}

proptest! {
    #[test]
    fn prop_convo_nonce_injective(r1: u32, role1 in 0u8..=1, r2: u32, role2 in 0u8..=1) {
        prop_assume!((r1, role1) != (r2, role2));
        prop_assert_ne!(convo_nonce(r1, role1), convo_nonce(r2, role2));
    }

    #[test]
    fn prop_direction_nonces_injective(r1: u32, r2: u32) {
        prop_assert_ne!(forward_nonce(r1), backward_nonce(r2));
    }

    #[test]
    fn prop_box_roundtrip(
        a_seed: [u8; 32],
        b_seed: [u8; 32],
        round: u32,
        role in 0u8..=1,
        payload in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let (a_shared, b_shared) = shared_from_seeds(a_seed, b_seed);
        let nonce = convo_nonce(round, role);

        let sealed = a_shared.seal(&nonce, &payload).unwrap();
        prop_assert_eq!(sealed.len(), payload.len() + BOX_OVERHEAD);
        prop_assert_eq!(b_shared.open(&nonce, &sealed).unwrap(), payload);
    }

    #[test]
    fn prop_box_rejects_nonce_mismatch(
        a_seed: [u8; 32],
        b_seed: [u8; 32],
        round: u32,
        payload in proptest::collection::vec(any::<u8>(), 1..128),
    ) {
        let (a_shared, b_shared) = shared_from_seeds(a_seed, b_seed);

        let sealed = a_shared.seal(&convo_nonce(round, 0), &payload).unwrap();
        prop_assert!(b_shared.open(&convo_nonce(round, 1), &sealed).is_err());
    }

    #[test]
    fn prop_dead_drop_symmetric(a_seed: [u8; 32], b_seed: [u8; 32], round: u32) {
        let (a_shared, b_shared) = shared_from_seeds(a_seed, b_seed);
        prop_assert_eq!(DeadDrop::derive(&a_shared, round), DeadDrop::derive(&b_shared, round));
    }

    #[test]
    fn prop_onion_reply_roundtrip(
        hop_seeds in proptest::collection::vec(any::<[u8; 32]>(), 1..4),
        round: u32,
        payload in proptest::collection::vec(any::<u8>(), 1..300),
        reply in proptest::collection::vec(any::<u8>(), 1..300),
    ) {
        let secrets: Vec<StaticSecret> =
            hop_seeds.into_iter().map(StaticSecret::from).collect();
        let publics: Vec<PublicKey> = secrets.iter().map(PublicKey::from).collect();
        let forward = forward_nonce(round);
        let backward = backward_nonce(round);

        let (mut onion, client_keys) = onion::seal(&payload, &forward, &publics).unwrap();

        let mut hop_keys = Vec::new();
        for secret in &secrets {
            let (inner, key) = onion::peel(secret, &onion, &forward).unwrap();
            onion = inner;
            hop_keys.push(key);
        }
        prop_assert_eq!(&onion, &payload);

        let mut wrapped = reply.clone();
        for key in hop_keys.iter().rev() {
            wrapped = onion::wrap_reply(&wrapped, &backward, key).unwrap();
        }
        prop_assert_eq!(onion::open(&wrapped, &backward, &client_keys).unwrap(), reply);
    }

    #[test]
    fn prop_constant_time_compare_matches_eq(
        a in proptest::collection::vec(any::<u8>(), 0..64),
        b in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assert_eq!(constant_time_compare(&a, &b), a == b);
    }
}
