// crates/storyreel-media/src/scheduler.rs
//
// LazyScheduler: one-shot source attachment for native video cards.
//
// Lifecycle per unit (keyed by the card's UUID, never by node markers):
//
//   register ──► Pending(sources) ──first visible──► Attached
//                                   later visible  ──► no-op
//
// Visible signals are produced by the surface's observer with a lead margin
// (`margin_px`), so attachment happens shortly BEFORE the card scrolls in.
// Attachments are queued on `rx`; the app drains them where it can reach the
// surface, exactly like the result channel of a background worker.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use uuid::Uuid;

use storyreel_core::helpers::renditions::VideoSource;

/// Sources to mount on one card, emitted at most once per card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub card:    Uuid,
    pub sources: Vec<VideoSource>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum UnitState {
    Pending(Vec<VideoSource>),
    Attached,
}

pub struct LazyScheduler {
    /// Attachments ready to be mounted. Drained by the UI after each event.
    pub rx:    Receiver<Attachment>,
    tx:        Sender<Attachment>,
    margin_px: u32,
    units:     HashMap<Uuid, UnitState>,
}

impl LazyScheduler {
    pub fn new(margin_px: u32) -> Self {
        let (tx, rx) = unbounded();
        Self { rx, tx, margin_px, units: HashMap::new() }
    }

    /// Lead margin the surface observer should be registered with.
    pub fn margin_px(&self) -> u32 {
        self.margin_px
    }

    /// Start tracking a unit. Re-registering a known unit is ignored so a
    /// card that was already attached never goes back to pending.
    pub fn register(&mut self, card: Uuid, sources: Vec<VideoSource>) -> bool {
        if self.units.contains_key(&card) {
            tracing::debug!(%card, "lazy unit already registered");
            return false;
        }
        self.units.insert(card, UnitState::Pending(sources));
        true
    }

    /// Feed one visibility signal. Returns true only for the signal that
    /// actually queued the attachment.
    pub fn signal_visible(&mut self, card: Uuid) -> bool {
        let Some(state) = self.units.get_mut(&card) else {
            tracing::debug!(%card, "visibility signal for unknown lazy unit");
            return false;
        };
        let UnitState::Pending(sources) = std::mem::replace(state, UnitState::Attached) else {
            return false;
        };

        tracing::debug!(%card, tiers = sources.len(), "attaching deferred sources");
        if self.tx.send(Attachment { card, sources }).is_err() {
            // Only possible if `rx` was dropped, which our own field prevents.
            tracing::warn!(%card, "attachment channel closed");
        }
        true
    }

    /// Units still waiting for their first visibility signal.
    pub fn pending(&self) -> usize {
        self.units.values().filter(|s| matches!(s, UnitState::Pending(_))).count()
    }

    /// Everything queued since the last drain, in signal order.
    pub fn drain(&self) -> Vec<Attachment> {
        self.rx.try_iter().collect()
    }
}
