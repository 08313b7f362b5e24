// crates/storyreel-ui/src/lib.rs
//
// Everything that touches a rendering surface: the `Surface` contract, the
// in-memory `DomSurface` host, the card / lightbox / nav builders and the
// `GalleryApp` event loop that ties them together.

pub mod app;
pub mod context;
pub mod dom;
pub mod helpers;
pub mod modules;
pub mod mount;
pub mod surface;
pub mod theme;

pub use app::{GalleryApp, MountReport};
pub use dom::DomSurface;
pub use mount::build_stage_page;
pub use surface::{
    IntersectionEntry, ListenerKind, NodeId, ObserverKind, PointerClass, ScrollAlign,
    ScrollMotion, Surface, SurfaceEvent,
};
