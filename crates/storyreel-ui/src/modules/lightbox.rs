// crates/storyreel-ui/src/modules/lightbox.rs
//
// LightboxController: the single shared overlay.
//
//   Closed ──open(card, stash?)──► Open(content)
//   Open   ──open(other)────────► Open(other)     (content replaced in place)
//   Open   ──close──────────────► Closed          (content node emptied)
//
// The shell (backdrop, dialog, close button, content node) is built on first
// open and reused afterwards. Closing detaches every media node under the
// content node so nothing keeps playing behind a hidden overlay.

use storyreel_core::helpers::geometry::{bounded_width_css, EMBED_ASPECT};
use storyreel_core::media_types::CardViewModel;
use storyreel_core::state::{LightboxContent, LightboxMedia, LightboxState, LightboxText};

use super::card::append_sources;
use super::{ClickRoute, RouteTable};
use crate::surface::{ListenerKind, NodeId, Surface};
use crate::theme;

#[derive(Clone, Copy, Debug)]
struct Shell {
    root:    NodeId,
    content: NodeId,
    close:   NodeId,
}

#[derive(Default)]
pub struct LightboxController {
    shell: Option<Shell>,
    state: LightboxState,
}

impl LightboxController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LightboxState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Overlay root, once built.
    pub fn root(&self) -> Option<NodeId> {
        self.shell.map(|s| s.root)
    }

    /// Node the per-card content is mounted under, once built.
    pub fn content_node(&self) -> Option<NodeId> {
        self.shell.map(|s| s.content)
    }

    pub fn close_button(&self) -> Option<NodeId> {
        self.shell.map(|s| s.close)
    }

    /// Show `card`. Replaces whatever was open in the same call.
    pub fn open<S: Surface>(
        &mut self,
        surface: &mut S,
        routes:  &mut RouteTable,
        card:    &CardViewModel,
        stashed_full: Option<&str>,
    ) {
        let shell = self.ensure_shell(surface, routes);
        let content = LightboxContent::for_card(card, stashed_full);

        surface.clear_children(shell.content);
        let media = build_media(surface, &content.media);
        surface.append_child(shell.content, media);
        if let Some(text) = &content.text {
            let block = build_text(surface, text);
            surface.append_child(shell.content, block);
        }

        surface.remove_attribute(shell.root, "hidden");
        surface.set_attribute(shell.root, "aria-hidden", "false");

        tracing::debug!(card = %card.id, replaced = self.state.is_open(), "lightbox open");
        self.state = LightboxState::Open(content);
    }

    /// Empty and hide the overlay. No-op when already closed.
    pub fn close<S: Surface>(&mut self, surface: &mut S) {
        if !self.state.is_open() {
            return;
        }
        if let Some(shell) = self.shell {
            surface.clear_children(shell.content);
            surface.set_attribute(shell.root, "hidden", "");
            surface.set_attribute(shell.root, "aria-hidden", "true");
        }
        tracing::debug!("lightbox closed");
        self.state = LightboxState::Closed;
    }

    fn ensure_shell<S: Surface>(&mut self, surface: &mut S, routes: &mut RouteTable) -> Shell {
        if let Some(shell) = self.shell {
            return shell;
        }

        let root = surface.create_element("div");
        surface.set_attribute(root, "class", theme::LIGHTBOX);
        surface.set_attribute(root, "hidden", "");

        let dialog = surface.create_element("div");
        surface.set_attribute(dialog, "class", theme::LIGHTBOX_DIALOG);
        surface.set_attribute(dialog, "role", "dialog");
        surface.set_attribute(dialog, "aria-modal", "true");
        surface.append_child(root, dialog);

        let close = surface.create_element("button");
        surface.set_attribute(close, "type", "button");
        surface.set_attribute(close, "class", theme::LIGHTBOX_CLOSE);
        surface.set_attribute(close, "aria-label", "Close");
        surface.set_text(close, theme::CLOSE_GLYPH);
        surface.append_child(dialog, close);

        let content = surface.create_element("div");
        surface.set_attribute(content, "class", theme::LIGHTBOX_BODY);
        surface.append_child(dialog, content);

        let page = surface.root();
        surface.append_child(page, root);

        surface.listen(root, ListenerKind::Click);
        surface.listen(close, ListenerKind::Click);
        surface.listen(page, ListenerKind::KeyDown);
        routes.insert(root, ClickRoute::LightboxBackdrop);
        routes.insert(close, ClickRoute::LightboxClose);

        let shell = Shell { root, content, close };
        self.shell = Some(shell);
        shell
    }
}

fn build_media<S: Surface>(surface: &mut S, media: &LightboxMedia) -> NodeId {
    match media {
        LightboxMedia::Image { url, alt } => {
            let img = surface.create_element("img");
            surface.set_attribute(img, "src", url);
            surface.set_attribute(img, "alt", alt);
            surface.set_attribute(img, "style", &theme::bounded_media_style());
            img
        }
        LightboxMedia::Embedded { video_id, embed_url } => {
            let frame = surface.create_element("div");
            let width = bounded_width_css(EMBED_ASPECT, theme::LIGHTBOX_MAX_VW, theme::LIGHTBOX_MAX_VH);
            surface.set_attribute(frame, "style", &format!("aspect-ratio:16/9;width:{width}"));

            let iframe = surface.create_element("iframe");
            surface.set_attribute(iframe, "src", embed_url);
            surface.set_attribute(iframe, "allow", theme::EMBED_ALLOW);
            surface.set_attribute(iframe, "allowfullscreen", "");
            surface.set_attribute(iframe, "title", &format!("Video {video_id}"));
            surface.append_child(frame, iframe);
            frame
        }
        LightboxMedia::Native { sources, poster } => {
            let video = surface.create_element("video");
            surface.set_attribute(video, "controls", "");
            surface.set_attribute(video, "autoplay", "");
            surface.set_attribute(video, "playsinline", "");
            surface.set_attribute(video, "style", &theme::bounded_media_style());
            if let Some(p) = poster {
                surface.set_attribute(video, "poster", p);
            }
            append_sources(surface, video, sources);
            video
        }
    }
}

fn build_text<S: Surface>(surface: &mut S, text: &LightboxText) -> NodeId {
    let block = surface.create_element("div");
    surface.set_attribute(block, "class", theme::LIGHTBOX_TEXT);
    if let Some(title) = &text.title {
        let h = surface.create_element("h3");
        surface.set_text(h, title);
        surface.append_child(block, h);
    }
    if let Some(story) = &text.story {
        let p = surface.create_element("p");
        surface.set_text(p, story);
        surface.append_child(block, p);
    }
    if let Some(details) = &text.details {
        let list = surface.create_element("ul");
        surface.set_attribute(list, "class", theme::LIGHTBOX_DETAILS);
        for line in details {
            let li = surface.create_element("li");
            surface.set_text(li, line);
            surface.append_child(list, li);
        }
        surface.append_child(block, list);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomSurface;
    use storyreel_core::helpers::renditions::VideoRenditions;
    use storyreel_core::media_types::{CardMedia, ImageView, NativeVideoView, VideoOrigin};
    use uuid::Uuid;

    fn card(media: CardMedia, title: Option<&str>, story: Option<&str>) -> CardViewModel {
        CardViewModel {
            id: Uuid::new_v4(),
            index: 0,
            stage: None,
            title: title.map(str::to_string),
            story: story.map(str::to_string),
            details: None,
            asset_key: None,
            caption: title.map(str::to_string),
            media,
        }
    }

    fn image(full: &str) -> CardMedia {
        CardMedia::Image(ImageView { grid_url: "g.jpg".into(), full_url: full.into(), alt: "Kit".into(), renditions: None })
    }

    #[test]
    fn shell_is_built_once_and_hidden_until_open() {
        let (mut dom, mut routes) = (DomSurface::new(), RouteTable::new());
        let mut lb = LightboxController::new();
        assert_eq!(lb.root(), None);

        lb.open(&mut dom, &mut routes, &card(image("a.jpg"), None, None), None);
        let root = lb.root().unwrap();
        assert_eq!(dom.attribute(root, "hidden"), None);

        lb.open(&mut dom, &mut routes, &card(image("b.jpg"), None, None), None);
        assert_eq!(lb.root(), Some(root));
        assert_eq!(dom.descendants_with_tag(dom.root(), "img").len(), 1);

        lb.close(&mut dom);
        assert_eq!(dom.attribute(root, "hidden").as_deref(), Some(""));
        assert!(dom.children(lb.content_node().unwrap()).is_empty());
    }

    #[test]
    fn stash_overrides_full_url_and_text_block_is_optional() {
        let (mut dom, mut routes) = (DomSurface::new(), RouteTable::new());
        let mut lb = LightboxController::new();

        lb.open(&mut dom, &mut routes, &card(image("full.jpg"), None, None), Some("stash.jpg"));
        let html = dom.node_html(lb.content_node().unwrap());
        assert!(html.contains(r#"src="stash.jpg""#));
        assert!(html.contains("max-width:92vw;max-height:88vh"));
        assert!(!html.contains(theme::LIGHTBOX_TEXT));

        lb.open(&mut dom, &mut routes, &card(image("full.jpg"), Some("Kit"), Some("Bold.")), None);
        let html = dom.node_html(lb.content_node().unwrap());
        assert!(html.contains(r#"src="full.jpg""#));
        assert!(html.contains("<h3>Kit</h3><p>Bold.</p>"));
    }

    #[test]
    fn details_render_as_a_list_after_the_story() {
        let (mut dom, mut routes) = (DomSurface::new(), RouteTable::new());
        let mut lb = LightboxController::new();

        let mut with = card(image("full.jpg"), None, Some("Bold."));
        with.details = Some(vec!["Stalks the ribbon".into(), "Sleeps <3".into()]);
        lb.open(&mut dom, &mut routes, &with, None);
        let html = dom.node_html(lb.content_node().unwrap());
        assert!(html.contains(
            r#"<p>Bold.</p><ul class="lightbox__details"><li>Stalks the ribbon</li><li>Sleeps &lt;3</li></ul>"#
        ));

        lb.open(&mut dom, &mut routes, &card(image("full.jpg"), None, Some("Bold.")), None);
        let html = dom.node_html(lb.content_node().unwrap());
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn native_video_autoplays_with_every_tier() {
        let (mut dom, mut routes) = (DomSurface::new(), RouteTable::new());
        let mut lb = LightboxController::new();
        let v = NativeVideoView {
            origin: VideoOrigin::Renditions(VideoRenditions::new("v/a", &[1080, 720, 480]).unwrap()),
            poster: Some("p.jpg".into()),
        };
        lb.open(&mut dom, &mut routes, &card(CardMedia::NativeVideo(v), None, None), None);

        let content = lb.content_node().unwrap();
        let video = dom.descendants_with_tag(content, "video")[0];
        assert_eq!(dom.attribute(video, "autoplay").as_deref(), Some(""));
        assert_eq!(dom.attribute(video, "poster").as_deref(), Some("p.jpg"));
        assert_eq!(dom.descendants_with_tag(video, "source").len(), 3);
    }

    #[test]
    fn close_when_closed_is_a_no_op() {
        let mut dom = DomSurface::new();
        let mut lb = LightboxController::new();
        lb.close(&mut dom);
        assert!(!lb.is_open());
        assert_eq!(lb.root(), None);
    }
}
