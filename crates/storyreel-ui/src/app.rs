// crates/storyreel-ui/src/app.rs
//
// GalleryApp: owns the surface, the runtime context and the builders, and
// runs the two-phase loop for every host event:
//
//   1. handle_event      translate the event into GalleryCommands (no mutation
//                        of the overlay or the page beyond nav bookkeeping)
//   2. process_commands  apply the queued commands, then drain lazy-source
//                        attachments the scheduler produced
//
// The initial render is `mount_feed`: classify → group → build cards into
// stage mount points → build the stage nav. A feed-level failure replaces the
// gallery root with the apology and nothing else is rendered.

use serde::Serialize;
use uuid::Uuid;

use storyreel_core::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use storyreel_core::media_types::{CardMedia, CardViewModel};
use storyreel_core::{
    Classifier, FeedError, FeedRecord, FeedSummary, GalleryCommand, GalleryConfig, Stage,
    StageGrouper,
};

use crate::context::GalleryContext;
use crate::modules::card::{append_sources, play_inline, CardBuilder, STASH_ATTR};
use crate::modules::lightbox::LightboxController;
use crate::modules::nav::StageNav;
use crate::modules::ClickRoute;
use crate::surface::{IntersectionEntry, NodeId, ObserverKind, PointerClass, Surface, SurfaceEvent};
use crate::theme;

/// Outcome of one successful render pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MountReport {
    pub summary: FeedSummary,
    /// Cards attached to a mount point.
    pub mounted: usize,
    /// Classified cards dropped because no mount point could take them.
    pub dropped: usize,
    /// Native videos whose sources wait for their first visibility signal.
    pub lazy_pending: usize,
}

// ── App ──────────────────────────────────────────────────────────────────────

pub struct GalleryApp<S: Surface> {
    surface:      S,
    config:       GalleryConfig,
    context:      GalleryContext,
    lightbox:     LightboxController,
    nav:          StageNav,
    /// Commands emitted while handling the current event.
    pending_cmds: Vec<GalleryCommand>,
}

impl<S: Surface> GalleryApp<S> {
    pub fn new(surface: S, config: GalleryConfig) -> Self {
        let context = GalleryContext::new(config.lazy_margin_px);
        Self {
            surface,
            config,
            context,
            lightbox:     LightboxController::new(),
            nav:          StageNav::default(),
            pending_cmds: Vec::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn lightbox(&self) -> &LightboxController {
        &self.lightbox
    }

    pub fn nav(&self) -> &StageNav {
        &self.nav
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.context.diagnostics
    }

    pub fn card(&self, id: Uuid) -> Option<&CardViewModel> {
        self.context.card(id)
    }

    /// Root node of a mounted card.
    pub fn card_node(&self, id: Uuid) -> Option<NodeId> {
        self.context.card_nodes.get(&id).map(|b| b.root)
    }

    /// Media region of a mounted card.
    pub fn card_media_node(&self, id: Uuid) -> Option<NodeId> {
        self.context.card_nodes.get(&id).map(|b| b.media)
    }

    /// Deferred `<video>` placeholder of a mounted card.
    pub fn lazy_node(&self, id: Uuid) -> Option<NodeId> {
        self.context.card_nodes.get(&id).and_then(|b| b.lazy)
    }

    /// Mounted cards in feed order.
    pub fn cards_in_feed_order(&self) -> Vec<&CardViewModel> {
        let mut cards: Vec<_> = self.context.cards.values().collect();
        cards.sort_by_key(|c| c.index);
        cards
    }

    /// Sender for hosts that push events from their own callbacks.
    pub fn event_sender(&self) -> crossbeam_channel::Sender<SurfaceEvent> {
        self.context.events.tx.clone()
    }

    // ── Initial render ───────────────────────────────────────────────────────

    /// Render a fetched feed. A feed-level error renders the apology and is
    /// handed back to the caller.
    pub fn mount_feed(&mut self, feed: Result<Vec<FeedRecord>, FeedError>) -> Result<MountReport, FeedError> {
        let records = match feed {
            Ok(records) => records,
            Err(e) => {
                self.render_apology(&e);
                return Err(e);
            }
        };

        let classified = Classifier::new(&self.config).classify_feed(records);
        let declared: Vec<String> = self
            .surface
            .elements_with_attribute("data-stage")
            .into_iter()
            .filter_map(|n| self.surface.attribute(n, "data-stage"))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        // Keys the page has no section for are unrecognized and fold into the
        // terminal stage. A page without sections accepts any key.
        let mut grouper = StageGrouper::new(self.config.terminal_stage.clone());
        if !declared.is_empty() {
            grouper = grouper.with_accepted(declared.clone()).with_declared(declared);
        }
        let stages = grouper.group(classified.cards.clone());

        let mut summary = FeedSummary::new(&classified);
        self.context.diagnostics.extend(classified.diagnostics);

        let mut mounted = 0;
        let mut dropped = 0;
        for stage in stages {
            summary.count_mounted(&stage.key, 0);
            let key = stage.key.clone();
            match self.mount_stage(stage) {
                Ok((landed, m)) => {
                    summary.count_mounted(landed.as_deref().unwrap_or(key.as_str()), m);
                    mounted += m;
                }
                Err(d) => dropped += d,
            }
        }

        self.nav = StageNav::build(&mut self.surface, &mut self.context.routes, &self.config, &mut self.context.diagnostics);

        let lazy_pending = self.context.lazy.pending();
        tracing::info!(
            records = summary.records,
            mounted,
            dropped,
            lazy_pending,
            rejected = summary.rejected,
            "gallery mounted"
        );
        Ok(MountReport { summary, mounted, dropped, lazy_pending })
    }

    /// Mount one stage's cards. `Ok((fallback, mounted))` names the stage
    /// whose mount point was borrowed, if any; `Err(dropped)` when no mount
    /// point exists at all.
    fn mount_stage(&mut self, stage: Stage) -> Result<(Option<String>, usize), usize> {
        let own = self.surface.element_by_id(&self.config.mount_id(&stage.key));
        let target = match own {
            Some(mount) => Some((mount, None)),
            None => {
                let terminal = &self.config.terminal_stage;
                let fallback = self.surface.element_by_id(&self.config.mount_id(terminal));
                if fallback.is_some() && !stage.cards.is_empty() {
                    tracing::debug!(stage = %stage.key, "no mount point, using terminal stage");
                }
                fallback.map(|m| (m, Some(terminal.clone())))
            }
        };

        let Some((mount, landed)) = target else {
            for card in &stage.cards {
                self.context.diagnostics.record(Diagnostic::new(
                    DiagnosticKind::MountMissing,
                    Some(card.index),
                    format!("no mount point for stage \"{}\" or \"{}\"", stage.key, self.config.terminal_stage),
                ));
            }
            return Err(stage.cards.len());
        };

        let count = stage.cards.len();
        for card in stage.cards {
            let built = CardBuilder::new(&mut self.surface, &mut self.context.routes, &mut self.context.lazy)
                .build(&card);
            self.surface.append_child(mount, built.root);
            self.context.track_card(card, built);
        }
        Ok((landed, count))
    }

    fn render_apology(&mut self, error: &FeedError) {
        let message = self.config.apology.clone();
        let host = match self.surface.element_by_id(&self.config.gallery_root_id) {
            Some(root) => {
                self.surface.clear_children(root);
                root
            }
            None => self.surface.root(),
        };

        let p = self.surface.create_element("p");
        self.surface.set_attribute(p, "class", theme::GALLERY_ERROR);
        self.surface.set_attribute(p, "role", "alert");
        self.surface.set_text(p, &message);
        self.surface.append_child(host, p);

        self.context.diagnostics.record(Diagnostic::new(DiagnosticKind::FeedUnavailable, None, error.to_string()));
    }

    // ── Event loop ───────────────────────────────────────────────────────────

    /// Translate one host event and apply everything it caused.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Click { listener, target } => self.on_click(listener, target),
            SurfaceEvent::KeyDown { key } => {
                if key == "Escape" && self.lightbox.is_open() {
                    self.pending_cmds.push(GalleryCommand::CloseLightbox);
                }
            }
            SurfaceEvent::Intersection { observer: ObserverKind::LazyMedia, entries } => {
                self.on_lazy_visibility(&entries);
            }
            SurfaceEvent::Intersection { observer: ObserverKind::StageSection, entries } => {
                self.nav.on_intersection(&mut self.surface, &entries);
            }
        }
        self.process_commands();
    }

    /// Drain events pushed through `event_sender`. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let events: Vec<SurfaceEvent> = self.context.events.rx.try_iter().collect();
        let n = events.len();
        for event in events {
            self.handle_event(event);
        }
        n
    }

    fn on_click(&mut self, listener: NodeId, target: NodeId) {
        let Some(route) = self.context.routes.get(&listener).copied() else {
            tracing::debug!(?listener, "click on node without a route");
            return;
        };
        let cmd = match route {
            ClickRoute::OpenCard(card) => GalleryCommand::OpenLightbox {
                card,
                stashed_full: self.surface.attribute(listener, STASH_ATTR),
            },
            ClickRoute::PlayEmbed(card) => match self.surface.pointer_class() {
                PointerClass::Coarse => GalleryCommand::OpenLightbox { card, stashed_full: None },
                PointerClass::Fine   => GalleryCommand::PlayInline(card),
            },
            ClickRoute::Popup(card) => GalleryCommand::OpenLightbox { card, stashed_full: None },
            ClickRoute::LightboxClose => GalleryCommand::CloseLightbox,
            ClickRoute::LightboxBackdrop => {
                if target != listener {
                    return;
                }
                GalleryCommand::CloseLightbox
            }
            ClickRoute::NavTab(index) => GalleryCommand::ScrollToStage(index),
        };
        self.pending_cmds.push(cmd);
    }

    fn on_lazy_visibility(&mut self, entries: &[IntersectionEntry]) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if let Some(card) = self.context.lazy_nodes.get(&entry.node) {
                self.pending_cmds.push(GalleryCommand::AttachSources(*card));
            }
        }
    }

    fn process_commands(&mut self) {
        let cmds: Vec<GalleryCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }
        self.ingest_attachments();
    }

    fn process_command(&mut self, cmd: GalleryCommand) {
        match cmd {
            // ── Lightbox ─────────────────────────────────────────────────────
            GalleryCommand::OpenLightbox { card, stashed_full } => {
                let Some(vm) = self.context.cards.get(&card) else {
                    tracing::warn!(%card, "open requested for unknown card");
                    return;
                };
                self.lightbox.open(&mut self.surface, &mut self.context.routes, vm, stashed_full.as_deref());
            }
            GalleryCommand::CloseLightbox => {
                self.lightbox.close(&mut self.surface);
            }

            // ── Cards ────────────────────────────────────────────────────────
            GalleryCommand::PlayInline(card) => {
                let media = self.context.card_nodes.get(&card).map(|b| b.media);
                let view = self.context.cards.get(&card).and_then(|c| match &c.media {
                    CardMedia::EmbeddedVideo(e) => Some(e),
                    _ => None,
                });
                if let (Some(media), Some(view)) = (media, view) {
                    play_inline(&mut self.surface, &mut self.context.routes, media, view);
                }
            }
            GalleryCommand::AttachSources(card) => {
                self.context.lazy.signal_visible(card);
            }

            // ── Navigation ───────────────────────────────────────────────────
            GalleryCommand::ScrollToStage(index) => {
                self.nav.scroll_to(&mut self.surface, index);
            }
        }
    }

    /// Mount every attachment the scheduler queued and stop observing the
    /// placeholders that received them.
    fn ingest_attachments(&mut self) {
        for attachment in self.context.lazy.drain() {
            let Some(video) = self.context.card_nodes.get(&attachment.card).and_then(|b| b.lazy) else {
                continue;
            };
            append_sources(&mut self.surface, video, &attachment.sources);
            self.surface.unobserve(video, ObserverKind::LazyMedia);
            self.context.lazy_nodes.remove(&video);
            tracing::debug!(card = %attachment.card, tiers = attachment.sources.len(), "sources attached");
        }
    }
}
