// crates/storyreel-core/src/media_types.rs
//
// Types that flow from the feed into the card builder and the lightbox.
// No surface types, just plain data.
//
// Two layers:
//   MediaItem      the raw record, exactly as the feed spells it. Every
//                  field is optional so a bad record still deserializes and
//                  can be rejected with a reason instead of a parse error.
//   CardViewModel  the classified item. Every URL the grid or lightbox
//                  will ever need is resolved once, at classification.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::helpers::renditions::{ImageRenditions, VideoRenditions, VideoSource};

/// One record of the feed document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind:      Option<String>,
    pub stage:     Option<String>,
    pub title:     Option<String>,
    pub alt:       Option<String>,
    pub story:     Option<String>,
    pub src:       Option<String>,
    pub thumb:     Option<String>,
    pub full:      Option<String>,
    pub base:      Option<String>,
    pub poster:    Option<String>,
    #[serde(rename = "videoId")]
    pub video_id:  Option<String>,
    /// Bullet points merged in from video analysis.
    pub details:   Option<Vec<String>>,
    /// Join key between the feed and the analysis results.
    pub asset_key: Option<String>,
}

/// Blank strings count as absent everywhere.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl MediaItem {
    pub fn stage_key(&self) -> Option<&str> { present(&self.stage) }
    pub fn title(&self)     -> Option<&str> { present(&self.title) }
    pub fn alt(&self)       -> Option<&str> { present(&self.alt) }
    pub fn story(&self)     -> Option<&str> { present(&self.story) }
    pub fn src(&self)       -> Option<&str> { present(&self.src) }
    pub fn thumb(&self)     -> Option<&str> { present(&self.thumb) }
    pub fn full(&self)      -> Option<&str> { present(&self.full) }
    pub fn base(&self)      -> Option<&str> { present(&self.base) }
    pub fn poster(&self)    -> Option<&str> { present(&self.poster) }
    pub fn video_id(&self)  -> Option<&str> { present(&self.video_id) }
    pub fn asset_key(&self) -> Option<&str> { present(&self.asset_key) }

    /// Non-blank detail lines, trimmed. `None` when nothing is left.
    pub fn details(&self) -> Option<Vec<String>> {
        let lines: Vec<String> = self
            .details
            .iter()
            .flatten()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        (!lines.is_empty()).then_some(lines)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    NativeVideo,
    EmbeddedVideo,
}

impl MediaKind {
    /// Value written to the card's `data-kind` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image         => "image",
            MediaKind::NativeVideo   => "video",
            MediaKind::EmbeddedVideo => "youtube",
        }
    }

    pub fn is_video(self) -> bool {
        !matches!(self, MediaKind::Image)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Still image. `grid_url` is what the card shows; `full_url` is what the
/// lightbox shows unless the originating card stashed something better.
///
/// Precedence, resolved once:
///   grid_url  = base smallest tier > thumb > src
///   full_url  = full > base largest tier > src > thumb
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageView {
    pub grid_url:   String,
    pub full_url:   String,
    pub alt:        String,
    /// Present on the multi-rendition path; drives `<picture>` srcsets.
    pub renditions: Option<ImageRenditions>,
}

/// Where a native video's playable bytes come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VideoOrigin {
    /// Quality tiers, attached lazily when the card nears the viewport.
    Renditions(VideoRenditions),
    /// A single file, attached immediately.
    Direct(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NativeVideoView {
    pub origin: VideoOrigin,
    pub poster: Option<String>,
}

impl NativeVideoView {
    /// Every source the surface may choose from, high to low.
    pub fn all_sources(&self) -> Vec<VideoSource> {
        match &self.origin {
            VideoOrigin::Renditions(r) => r.sources(),
            VideoOrigin::Direct(src)   => vec![VideoSource::direct(src.clone())],
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.origin, VideoOrigin::Renditions(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedVideoView {
    pub video_id:   String,
    /// Poster override, or the host's computed default thumbnail.
    pub poster_url: String,
    /// Player URL with autoplay on. Only ever loaded after a click.
    pub embed_url:  String,
}

/// The tagged union every downstream stage dispatches on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CardMedia {
    Image(ImageView),
    NativeVideo(NativeVideoView),
    EmbeddedVideo(EmbeddedVideoView),
}

impl CardMedia {
    pub fn kind(&self) -> MediaKind {
        match self {
            CardMedia::Image(_)         => MediaKind::Image,
            CardMedia::NativeVideo(_)   => MediaKind::NativeVideo,
            CardMedia::EmbeddedVideo(_) => MediaKind::EmbeddedVideo,
        }
    }
}

/// A classified feed item, ready to be built into a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardViewModel {
    /// Stable identity for lazy-attachment and lightbox bookkeeping.
    pub id:        Uuid,
    /// Position in the feed (0-based), for diagnostics.
    pub index:     usize,
    /// Declared stage key, if any. The grouper decides the effective stage.
    pub stage:     Option<String>,
    pub title:     Option<String>,
    pub story:     Option<String>,
    /// Never `Some` of an empty list.
    pub details:   Option<Vec<String>>,
    /// Caption line under the card. `title`, else none.
    pub caption:   Option<String>,
    /// Written to the card as `data-asset` when present.
    pub asset_key: Option<String>,
    pub media:     CardMedia,
}

impl CardViewModel {
    pub fn kind(&self) -> MediaKind {
        self.media.kind()
    }

    /// False when the lightbox text block should be omitted entirely.
    pub fn has_text(&self) -> bool {
        self.title.is_some() || self.story.is_some() || self.details.is_some()
    }
}
