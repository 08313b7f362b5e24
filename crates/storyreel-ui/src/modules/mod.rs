// crates/storyreel-ui/src/modules/mod.rs
//
// Page builders. Each one writes markup through `Surface` and registers the
// click routes its nodes answer to; none of them mutates another's nodes.
//
//   card      one card per view-model, placed into a stage mount point
//   lightbox  the shared overlay and its open/closed state
//   nav       stage tabs and active-section tracking
//
// Click handling never happens here: the app resolves a `SurfaceEvent::Click`
// through the route table and turns it into a `GalleryCommand`.

pub mod card;
pub mod lightbox;
pub mod nav;

use std::collections::HashMap;

use uuid::Uuid;

use crate::surface::NodeId;

/// What a listening node does when clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickRoute {
    /// Card body: image cards open the lightbox.
    OpenCard(Uuid),
    /// Embedded poster: play inline, or open the lightbox on coarse pointers.
    PlayEmbed(Uuid),
    /// Popup control on video cards. Always opens the lightbox.
    Popup(Uuid),
    LightboxClose,
    /// Overlay root. Only a click on the backdrop itself closes.
    LightboxBackdrop,
    NavTab(usize),
}

/// Listening node → its route. Owned by `GalleryContext`.
pub type RouteTable = HashMap<NodeId, ClickRoute>;
