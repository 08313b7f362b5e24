// crates/storyreel-media/src/sources.rs
//
// Which playable sources a native video card gets, and when.

use storyreel_core::helpers::renditions::VideoSource;
use storyreel_core::media_types::{NativeVideoView, VideoOrigin};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourcePlan {
    /// Rendition tiers (high to low). Held back until the card first nears
    /// the viewport; the grid placeholder starts with no source at all.
    Deferred(Vec<VideoSource>),
    /// A single direct file. Cheap enough to attach at build time.
    Immediate(Vec<VideoSource>),
}

impl SourcePlan {
    pub fn sources(&self) -> &[VideoSource] {
        match self {
            SourcePlan::Deferred(s) | SourcePlan::Immediate(s) => s,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, SourcePlan::Deferred(_))
    }
}

pub fn plan_sources(view: &NativeVideoView) -> SourcePlan {
    match &view.origin {
        VideoOrigin::Renditions(r) => SourcePlan::Deferred(r.sources()),
        VideoOrigin::Direct(src)   => SourcePlan::Immediate(vec![VideoSource::direct(src.clone())]),
    }
}
