// crates/storyreel-ui/src/theme.rs
// Class names and inline style constants shared by the card, lightbox and
// nav builders. Host stylesheets key off these names.

// ── Page ─────────────────────────────────────────────────────────────────────
pub const NAV_STRIP:       &str = "stage-nav";
pub const STAGE_SECTION:   &str = "stage-section";
pub const GRID:            &str = "gallery-grid";
pub const GALLERY_ERROR:   &str = "gallery-error";

// ── Cards ────────────────────────────────────────────────────────────────────
pub const CARD:            &str = "card";
pub const CARD_MEDIA:      &str = "card__media";
pub const CARD_CAPTION:    &str = "card__caption";
pub const CARD_POPUP:      &str = "card__popup";
pub const CARD_PLAY:       &str = "card__play";
pub const CARD_EMBED:      &str = "card__embed";

pub const PLAY_GLYPH:      &str = "\u{25B6}";
pub const POPUP_LABEL:     &str = "Open in viewer";

// ── Lightbox ─────────────────────────────────────────────────────────────────
pub const LIGHTBOX:         &str = "lightbox";
pub const LIGHTBOX_DIALOG:  &str = "lightbox__dialog";
pub const LIGHTBOX_CLOSE:   &str = "lightbox__close";
pub const LIGHTBOX_BODY:    &str = "lightbox__content";
pub const LIGHTBOX_TEXT:    &str = "lightbox__text";
pub const LIGHTBOX_DETAILS: &str = "lightbox__details";
pub const CLOSE_GLYPH:      &str = "\u{00D7}";

/// Lightbox media never exceeds this share of the viewport.
pub const LIGHTBOX_MAX_VW: f32 = 92.0;
pub const LIGHTBOX_MAX_VH: f32 = 88.0;

pub fn bounded_media_style() -> String {
    format!("max-width:{LIGHTBOX_MAX_VW}vw;max-height:{LIGHTBOX_MAX_VH}vh")
}

// ── Nav ──────────────────────────────────────────────────────────────────────
pub const TAB:             &str = "stage-tab";
pub const TAB_CURRENT:     &str = "stage-tab is-current";

pub const EMBED_ALLOW:     &str = "autoplay; encrypted-media; picture-in-picture";
