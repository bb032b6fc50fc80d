//! Display surface seam.
//!
//! The engine never draws; it hands finished lines to a [`ConvoDisplay`] and
//! pokes a [`FlushNotifier`] when the status snapshot changes.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

/// Sink for formatted conversation lines.
pub trait ConvoDisplay: Send + Sync {
    fn print_line(&self, line: &str);
}

/// Non-blocking redraw requests for the display surface.
///
/// Redraws are cosmetic. When the consumer lags, extra requests are dropped
/// rather than stalling round processing.
#[derive(Clone)]
pub struct FlushNotifier {
    tx: SyncSender<()>,
}

impl FlushNotifier {
    pub fn new(capacity: usize) -> (Self, Receiver<()>) {
        let (tx, rx) = sync_channel(capacity);
        (Self { tx }, rx)
    }

    /// Request a redraw. Never blocks; a full or disconnected channel drops
    /// the request.
    pub fn notify(&self) {
        let _ = self.tx.try_send(());
    }
}
