// crates/storyreel-ui/src/modules/card.rs
//
// Card Builder: CardViewModel → one mounted card.
//
//   <figure class="card card--{kind}" data-card="{uuid}" data-kind="{kind}"
//           data-asset="{asset_key}">         (asset key only when known)
//     <div class="card__media"> … grid-resolution media … </div>
//     <button class="card__popup">      (video kinds only)
//     <figcaption class="card__caption"> (when a caption exists)
//   </figure>
//
// The grid region only ever references grid-resolution URLs. Image cards
// stash their full-resolution URL in `data-full` for the lightbox; `<picture>`
// srcsets stop one tier below the top so a wide viewport cannot pull the
// lightbox rendition into the grid.

use storyreel_core::helpers::renditions::{ImageFormat, VideoSource};
use storyreel_core::media_types::{CardMedia, CardViewModel, EmbeddedVideoView, ImageView, NativeVideoView};
use storyreel_media::{plan_sources, LazyScheduler, SourcePlan};

use super::{ClickRoute, RouteTable};
use crate::surface::{ListenerKind, NodeId, ObserverKind, Surface};
use crate::theme;

/// Attribute carrying the full-resolution URL on image cards.
pub const STASH_ATTR: &str = "data-full";

/// Node handles for one built card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltCard {
    pub root:  NodeId,
    pub media: NodeId,
    /// `<video>` placeholder registered with the lazy scheduler.
    pub lazy:  Option<NodeId>,
}

pub struct CardBuilder<'a, S: Surface> {
    surface:   &'a mut S,
    routes:    &'a mut RouteTable,
    scheduler: &'a mut LazyScheduler,
}

impl<'a, S: Surface> CardBuilder<'a, S> {
    pub fn new(surface: &'a mut S, routes: &'a mut RouteTable, scheduler: &'a mut LazyScheduler) -> Self {
        Self { surface, routes, scheduler }
    }

    /// Build the card (detached). The caller appends `root` to a mount point.
    pub fn build(&mut self, card: &CardViewModel) -> BuiltCard {
        let kind = card.kind().as_str();

        let root = self.surface.create_element("figure");
        self.surface.set_attribute(root, "class", &format!("{} {}--{kind}", theme::CARD, theme::CARD));
        self.surface.set_attribute(root, "data-card", &card.id.to_string());
        self.surface.set_attribute(root, "data-kind", kind);
        if let Some(asset) = &card.asset_key {
            self.surface.set_attribute(root, "data-asset", asset);
        }

        let media = self.surface.create_element("div");
        self.surface.set_attribute(media, "class", theme::CARD_MEDIA);
        self.surface.append_child(root, media);

        let mut lazy = None;
        match &card.media {
            CardMedia::Image(img) => {
                self.image(media, img);
                self.surface.set_attribute(root, STASH_ATTR, &img.full_url);
                self.route(root, ClickRoute::OpenCard(card.id));
            }
            CardMedia::NativeVideo(v) => {
                lazy = self.native_video(media, card, v);
                self.popup(root, card);
            }
            CardMedia::EmbeddedVideo(e) => {
                self.embed_poster(media, e, card.caption.as_deref());
                self.route(media, ClickRoute::PlayEmbed(card.id));
                self.popup(root, card);
            }
        }

        if let Some(caption) = &card.caption {
            let fig = self.surface.create_element("figcaption");
            self.surface.set_attribute(fig, "class", theme::CARD_CAPTION);
            self.surface.set_text(fig, caption);
            self.surface.append_child(root, fig);
        }

        BuiltCard { root, media, lazy }
    }

    fn route(&mut self, node: NodeId, route: ClickRoute) {
        self.surface.listen(node, ListenerKind::Click);
        self.routes.insert(node, route);
    }

    // ── Image ────────────────────────────────────────────────────────────────

    fn image(&mut self, media: NodeId, img: &ImageView) {
        let Some(r) = &img.renditions else {
            let el = self.surface.create_element("img");
            self.surface.set_attribute(el, "src", &img.grid_url);
            self.surface.set_attribute(el, "alt", &img.alt);
            self.surface.set_attribute(el, "loading", "lazy");
            self.surface.append_child(media, el);
            return;
        };

        let widths = r.grid_widths();
        let picture = self.surface.create_element("picture");
        let webp = self.surface.create_element("source");
        self.surface.set_attribute(webp, "type", ImageFormat::Webp.mime());
        self.surface.set_attribute(webp, "srcset", &r.srcset(widths, ImageFormat::Webp));
        self.surface.append_child(picture, webp);

        let el = self.surface.create_element("img");
        self.surface.set_attribute(el, "src", &img.grid_url);
        self.surface.set_attribute(el, "srcset", &r.srcset(widths, ImageFormat::Jpeg));
        self.surface.set_attribute(el, "alt", &img.alt);
        self.surface.set_attribute(el, "loading", "lazy");
        self.surface.append_child(picture, el);

        self.surface.append_child(media, picture);
    }

    // ── Native video ─────────────────────────────────────────────────────────

    fn native_video(&mut self, media: NodeId, card: &CardViewModel, v: &NativeVideoView) -> Option<NodeId> {
        let video = self.surface.create_element("video");
        self.surface.set_attribute(video, "controls", "");
        self.surface.set_attribute(video, "playsinline", "");
        self.surface.set_attribute(video, "preload", "none");
        if let Some(poster) = &v.poster {
            self.surface.set_attribute(video, "poster", poster);
        }
        self.surface.append_child(media, video);

        match plan_sources(v) {
            SourcePlan::Immediate(sources) => {
                append_sources(&mut *self.surface, video, &sources);
                None
            }
            SourcePlan::Deferred(sources) => {
                self.scheduler.register(card.id, sources);
                self.surface.observe(video, ObserverKind::LazyMedia, self.scheduler.margin_px());
                Some(video)
            }
        }
    }

    // ── Embedded video ───────────────────────────────────────────────────────

    fn embed_poster(&mut self, media: NodeId, e: &EmbeddedVideoView, caption: Option<&str>) {
        self.surface.set_attribute(media, "class", &format!("{} {}", theme::CARD_MEDIA, theme::CARD_EMBED));
        self.surface.set_attribute(media, "role", "button");
        self.surface.set_attribute(media, "data-video-id", &e.video_id);

        let poster = self.surface.create_element("img");
        self.surface.set_attribute(poster, "src", &e.poster_url);
        self.surface.set_attribute(poster, "alt", caption.unwrap_or(""));
        self.surface.set_attribute(poster, "loading", "lazy");
        self.surface.append_child(media, poster);

        let play = self.surface.create_element("span");
        self.surface.set_attribute(play, "class", theme::CARD_PLAY);
        self.surface.set_attribute(play, "aria-hidden", "true");
        self.surface.set_text(play, theme::PLAY_GLYPH);
        self.surface.append_child(media, play);
    }

    fn popup(&mut self, root: NodeId, card: &CardViewModel) {
        let button = self.surface.create_element("button");
        self.surface.set_attribute(button, "type", "button");
        self.surface.set_attribute(button, "class", theme::CARD_POPUP);
        self.surface.set_attribute(button, "aria-label", theme::POPUP_LABEL);
        self.surface.set_text(button, "\u{2922}");
        self.surface.append_child(root, button);
        self.route(button, ClickRoute::Popup(card.id));
    }
}

/// Append one `<source>` per tier, in the given (high → low) order.
pub fn append_sources<S: Surface + ?Sized>(surface: &mut S, video: NodeId, sources: &[VideoSource]) {
    for s in sources {
        let el = surface.create_element("source");
        surface.set_attribute(el, "src", &s.src);
        surface.set_attribute(el, "type", &s.mime);
        if let Some(h) = s.height {
            surface.set_attribute(el, "data-height", &h.to_string());
        }
        surface.append_child(video, el);
    }
}

/// Swap an embedded card's poster for the live player. The media node stops
/// routing clicks afterwards.
pub fn play_inline<S: Surface>(surface: &mut S, routes: &mut RouteTable, media: NodeId, e: &EmbeddedVideoView) {
    surface.clear_children(media);
    surface.remove_attribute(media, "role");

    let iframe = surface.create_element("iframe");
    surface.set_attribute(iframe, "src", &e.embed_url);
    surface.set_attribute(iframe, "allow", theme::EMBED_ALLOW);
    surface.set_attribute(iframe, "allowfullscreen", "");
    surface.set_attribute(iframe, "title", "Video player");
    surface.append_child(media, iframe);

    routes.remove(&media);
}
