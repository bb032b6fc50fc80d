//! Conversation engine: per-round request production and response
//! reconciliation.
//!
//! An external round scheduler drives the engine: once per round it calls
//! [`Conversation::next_convo_request`] and submits the returned onion, and
//! when the mix chain answers it hands the response to
//! [`Conversation::handle_convo_response`]. The engine owns everything in
//! between: picking queued text or a heartbeat, sealing it under the round
//! nonce, deriving the dead drop, wrapping the onion, and deciding from the
//! response whether the peer is actually there.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use murmur_crypto::box_crypto::SharedSecret;
use murmur_crypto::dead_drop::DeadDrop;
use murmur_crypto::nonce;
use murmur_crypto::onion;
use murmur_crypto::utils::constant_time_compare;

use crate::codec::ConvoMessage;
use crate::display::{ConvoDisplay, FlushNotifier};
use crate::errors::ConvoError;
use crate::pending::{PendingRound, PendingRounds};
use crate::pki::Pki;
use crate::types::{
    ConvoExchange, ConvoRequest, ConvoResponse, PeerIdentity, SIZE_ENCRYPTED_MESSAGE,
};

/// Outgoing text waiting for a round. The bound applies backpressure to the
/// producer when rounds stall instead of growing without limit.
const OUT_QUEUE_CAPACITY: usize = 64;

/// Point-in-time session health, recomputed after every processed response.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Status {
    /// Whether the most recent round carried a genuine peer message.
    pub peer_responding: bool,
    /// Latest round the engine produced a request for.
    pub round: u32,
    /// Last measured round-trip delay, from the peer's heartbeat clock.
    pub latency_secs: f64,
}

struct SessionState {
    pending_rounds: PendingRounds,
    last_peer_responding: bool,
    last_latency: Duration,
    last_round: u32,
}

/// One end of a two-party conversation.
///
/// All methods take `&self`; the engine is safe to share across the
/// scheduler, the response handler, and status readers.
pub struct Conversation {
    identity: PeerIdentity,
    peer_name: String,
    shared_secret: SharedSecret,
    pki: Arc<dyn Pki>,
    display: Arc<dyn ConvoDisplay>,
    flush: FlushNotifier,

    out_tx: SyncSender<Vec<u8>>,
    out_rx: Mutex<Receiver<Vec<u8>>>,

    state: RwLock<SessionState>,
}

impl Conversation {
    pub fn new(
        identity: PeerIdentity,
        peer_name: impl Into<String>,
        pki: Arc<dyn Pki>,
        display: Arc<dyn ConvoDisplay>,
        flush: FlushNotifier,
    ) -> Self {
        let shared_secret = SharedSecret::precompute(&identity.my_secret, &identity.peer_public);
        let (out_tx, out_rx) = sync_channel(OUT_QUEUE_CAPACITY);

        Self {
            identity,
            peer_name: peer_name.into(),
            shared_secret,
            pki,
            display,
            flush,
            out_tx,
            out_rx: Mutex::new(out_rx),
            state: RwLock::new(SessionState {
                pending_rounds: PendingRounds::new(),
                last_peer_responding: false,
                last_latency: Duration::ZERO,
                last_round: 0,
            }),
        }
    }

    /// A solo conversation addresses ourselves: the same key on both ends.
    pub fn solo(&self) -> bool {
        self.identity.my_public.as_bytes() == self.identity.peer_public.as_bytes()
    }

    // Roles keep the two directions of a round on distinct nonces. The
    // lexicographically smaller public key sends as role 0; equal keys
    // (solo) resolve to role 1 on both ends.
    fn my_role(&self) -> u8 {
        if self.identity.my_public.as_bytes() < self.identity.peer_public.as_bytes() {
            0
        } else {
            1
        }
    }

    fn their_role(&self) -> u8 {
        if self.identity.peer_public.as_bytes() < self.identity.my_public.as_bytes() {
            0
        } else {
            1
        }
    }

    /// Queue text for the next available round. Blocks once
    /// [`OUT_QUEUE_CAPACITY`] messages are already waiting.
    pub fn queue_text_message(&self, msg: Vec<u8>) {
        // The receiver lives as long as self, so this only fails during drop.
        let _ = self.out_tx.send(msg);
    }

    fn round_dead_drop(&self, round: u32) -> DeadDrop {
        if self.solo() {
            DeadDrop::random()
        } else {
            DeadDrop::derive(&self.shared_secret, round)
        }
    }

    fn seal_message(&self, frame: &[u8], round: u32) -> Result<Vec<u8>, ConvoError> {
        let n = nonce::convo_nonce(round, self.my_role());
        self.shared_secret.seal(&n, frame).map_err(|_| ConvoError::EncryptionFailed)
    }

    fn open_message(&self, ciphertext: &[u8], round: u32) -> Result<Vec<u8>, ConvoError> {
        let n = nonce::convo_nonce(round, self.their_role());
        self.shared_secret.open(&n, ciphertext).map_err(|_| ConvoError::MessageDecryptionFailed)
    }

    /// Produce this round's request. Called exactly once per round; each
    /// round sends either the oldest queued text or a heartbeat, never
    /// nothing.
    pub fn next_convo_request(&self, round: u32) -> Result<ConvoRequest, ConvoError> {
        self.state.write().last_round = round;
        self.flush.notify();

        let message = match self.out_rx.lock().try_recv() {
            Ok(body) => ConvoMessage::Text(body),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                ConvoMessage::Timestamp(unix_now())
            }
        };

        let frame = message.encode()?;
        let ciphertext = self.seal_message(&frame, round)?;
        let mut encrypted_message = [0u8; SIZE_ENCRYPTED_MESSAGE];
        encrypted_message.copy_from_slice(&ciphertext);

        let exchange =
            ConvoExchange { dead_drop: self.round_dead_drop(round), encrypted_message };
        debug!(
            round,
            dead_drop = %hex::encode(&exchange.dead_drop.as_bytes()[..8]),
            "sealed round request"
        );

        let (onion, shared_keys) = onion::seal(
            &exchange.marshal(),
            &nonce::forward_nonce(round),
            &self.pki.server_keys(),
        )
        .map_err(|_| ConvoError::EncryptionFailed)?;

        self.state.write().pending_rounds.put(
            round,
            PendingRound { onion_shared_keys: shared_keys, sent_ciphertext: encrypted_message },
        );

        Ok(ConvoRequest { round, onion })
    }

    /// Reconcile the mix chain's response for a round. Failures are logged
    /// and swallowed; a lost round only shows up as the peer not responding
    /// until the next good round.
    pub fn handle_convo_response(&self, response: &ConvoResponse) {
        let round = response.round;

        let pending = {
            let mut state = self.state.write();
            state.pending_rounds.take(round)
        };
        // A response for a round we never sent (or already consumed) says
        // nothing about the peer; leave the snapshot untouched.
        let pending = match pending {
            Some(p) => p,
            None => {
                let err = ConvoError::RoundNotFound(round);
                error!(round, %err, "dropping response");
                return;
            }
        };

        let responding = self.process_response(round, &response.onion, pending);
        self.state.write().last_peer_responding = responding;
        self.flush.notify();
    }

    fn process_response(&self, round: u32, onion_bytes: &[u8], pending: PendingRound) -> bool {
        let encrypted = match onion::open(
            onion_bytes,
            &nonce::backward_nonce(round),
            &pending.onion_shared_keys,
        )
        .map_err(|_| ConvoError::OnionDecryptionFailed)
        {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(round, %err, "decrypting onion failed");
                return false;
            }
        };

        // The mix echoes our own submission back when nobody else wrote to
        // the dead drop. In solo mode the echo is the expected reply.
        if constant_time_compare(&encrypted, &pending.sent_ciphertext) && !self.solo() {
            return false;
        }

        let frame = match self.open_message(&encrypted, round) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(round, %err, "decrypting peer message failed");
                return false;
            }
        };

        let message = match ConvoMessage::decode(&frame) {
            Ok(m) => m,
            Err(err) => {
                error!(round, %err, "decoding peer message failed");
                return false;
            }
        };

        match message {
            ConvoMessage::Text(body) => {
                // Padding is stripped here, at the edge: a text that really
                // ends in NUL bytes is indistinguishable from padding.
                let text = String::from_utf8_lossy(&body);
                let text = text.trim_end_matches('\0');
                self.display.print_line(&format!("<{}> {}", self.peer_name, text));
            }
            ConvoMessage::Timestamp(sent_at) => {
                let delay = unix_now().saturating_sub(sent_at).max(0) as u64;
                self.state.write().last_latency = Duration::from_secs(delay);
            }
        }

        true
    }

    /// Snapshot of session health, safe to call from any thread.
    pub fn status(&self) -> Status {
        let state = self.state.read();
        Status {
            peer_responding: state.last_peer_responding,
            round: state.last_round,
            latency_secs: state.last_latency.as_secs_f64(),
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
