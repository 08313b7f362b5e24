// crates/storyreel-core/src/commands.rs
//
// Every user-visible action in the gallery is expressed as a GalleryCommand.
// Surface event handlers emit these; the app processes them after the event
// pass, so a handler never mutates the overlay or the page directly.
// Adding a new interaction = add a variant here + one match arm in app.rs.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryCommand {
    // ── Lightbox ─────────────────────────────────────────────────────────────
    /// Open (or replace) the lightbox with this card. `stashed_full` is the
    /// full-resolution URL the originating card carried, if any; it wins over
    /// everything the view-model resolved.
    OpenLightbox { card: Uuid, stashed_full: Option<String> },
    CloseLightbox,

    // ── Cards ────────────────────────────────────────────────────────────────
    /// Swap an embedded card's poster for the live player.
    PlayInline(Uuid),
    /// First visibility signal for a lazy native video.
    AttachSources(Uuid),

    // ── Navigation ───────────────────────────────────────────────────────────
    /// Scroll the section for this tab index into view.
    ScrollToStage(usize),
}
