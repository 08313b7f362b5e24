// crates/storyreel-ui/src/context.rs
//
// GalleryContext owns the runtime bookkeeping that is NOT part of the page
// markup or the pure overlay/nav state. GalleryApp holds one of these plus
// the surface and the three builders, nothing else.
//
// Layout:
//   GalleryContext
//     ├── routes       listening node → ClickRoute
//     ├── cards        card UUID → view-model (lightbox source of truth)
//     ├── card_nodes   card UUID → built node handles
//     ├── lazy_nodes   <video> placeholder → card UUID (observer lookups)
//     ├── lazy         one-shot source attachment scheduler
//     ├── events       host → app channel, drained by `GalleryApp::pump`
//     └── diagnostics  every rejection / drop recorded this render pass

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use uuid::Uuid;

use storyreel_core::diagnostics::Diagnostics;
use storyreel_core::media_types::CardViewModel;
use storyreel_media::LazyScheduler;

use crate::modules::card::BuiltCard;
use crate::modules::RouteTable;
use crate::surface::{NodeId, SurfaceEvent};

pub struct EventChannel {
    pub tx: Sender<SurfaceEvent>,
    pub rx: Receiver<SurfaceEvent>,
}

impl EventChannel {
    fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

pub struct GalleryContext {
    pub routes:      RouteTable,
    pub cards:       HashMap<Uuid, CardViewModel>,
    pub card_nodes:  HashMap<Uuid, BuiltCard>,
    pub lazy_nodes:  HashMap<NodeId, Uuid>,
    pub lazy:        LazyScheduler,
    pub events:      EventChannel,
    pub diagnostics: Diagnostics,
}

impl GalleryContext {
    pub fn new(lazy_margin_px: u32) -> Self {
        Self {
            routes:      RouteTable::new(),
            cards:       HashMap::new(),
            card_nodes:  HashMap::new(),
            lazy_nodes:  HashMap::new(),
            lazy:        LazyScheduler::new(lazy_margin_px),
            events:      EventChannel::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Remember a mounted card so clicks and observer signals can find it.
    pub fn track_card(&mut self, card: CardViewModel, built: BuiltCard) {
        if let Some(video) = built.lazy {
            self.lazy_nodes.insert(video, card.id);
        }
        self.card_nodes.insert(card.id, built);
        self.cards.insert(card.id, card);
    }

    pub fn card(&self, id: Uuid) -> Option<&CardViewModel> {
        self.cards.get(&id)
    }
}
