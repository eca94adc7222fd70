//! Pick-up / drop notifications for an external feedback system
//! (sound, haptics). Delivery is best effort: a dropped receiver is ignored.

use crate::types::StickerId;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickerCue {
    /// A move session started on the sticker
    PickUp(StickerId),
    /// A move session ended, or a new sticker was placed
    Drop(StickerId),
}

/// Sending half of the cue channel. The default sender discards cues.
#[derive(Clone, Debug, Default)]
pub struct CueSender {
    tx: Option<Sender<StickerCue>>,
}

impl CueSender {
    pub fn channel() -> (Self, Receiver<StickerCue>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn send(&self, cue: StickerCue) {
        let Some(tx) = &self.tx else { return };
        if tx.send(cue).is_err() {
            trace!(?cue, "cue receiver gone");
        }
    }
}
