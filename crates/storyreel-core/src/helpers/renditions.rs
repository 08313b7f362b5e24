// crates/storyreel-core/src/helpers/renditions.rs
//
// Naming convention for multi-rendition assets.
//
//   image  base "media/kit-04"  →  media/kit-04-800.webp   media/kit-04-800.jpg
//                                  media/kit-04-1600.webp  media/kit-04-1600.jpg
//                                  media/kit-04-2400.webp  media/kit-04-2400.jpg
//
//   video  base "media/kit-09"  →  media/kit-09-1080.mp4
//                                  media/kit-09-720.mp4
//                                  media/kit-09-480.mp4
//
// Widths/heights come from `GalleryConfig` so a site can publish other tiers
// without touching this file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_IMAGE_WIDTHS: [u32; 3] = [800, 1600, 2400];
pub const DEFAULT_VIDEO_HEIGHTS: [u32; 3] = [1080, 720, 480];

/// Encodings published for every image width. Listed in the order a
/// `<picture>` should offer them: compressed first, universal fallback last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Webp,
    Jpeg,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Webp, ImageFormat::Jpeg];

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Webp => "image/webp",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// A rendition set with no usable tier. Only reachable by deserializing.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("rendition set for \"{0}\" has no non-zero tier")]
pub struct NoTiers(pub String);

/// Serialized shape shared by both rendition sets; validated on the way in.
#[derive(Debug, Deserialize)]
pub struct RawTiers {
    pub base:  String,
    #[serde(alias = "widths", alias = "heights")]
    pub tiers: Vec<u32>,
}

/// Width-tiered image renditions derived from a `base` path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTiers")]
pub struct ImageRenditions {
    base:   String,
    /// Ascending, deduplicated, never empty.
    widths: Vec<u32>,
}

impl TryFrom<RawTiers> for ImageRenditions {
    type Error = NoTiers;

    fn try_from(raw: RawTiers) -> Result<Self, Self::Error> {
        Self::new(raw.base.clone(), &raw.tiers).ok_or(NoTiers(raw.base))
    }
}

impl ImageRenditions {
    /// Returns `None` when `widths` is empty; a base with no tiers names no file.
    pub fn new(base: impl Into<String>, widths: &[u32]) -> Option<Self> {
        let mut widths: Vec<u32> = widths.iter().copied().filter(|w| *w > 0).collect();
        widths.sort_unstable();
        widths.dedup();
        if widths.is_empty() {
            return None;
        }
        Some(Self { base: base.into(), widths })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn url(&self, width: u32, format: ImageFormat) -> String {
        format!("{}-{}.{}", self.base, width, format.extension())
    }

    pub fn smallest(&self) -> u32 {
        self.widths[0]
    }

    pub fn largest(&self) -> u32 {
        self.widths[self.widths.len() - 1]
    }

    /// Tiers the grid may pick from. The top tier is reserved for the
    /// lightbox, unless it is the only tier there is.
    pub fn grid_widths(&self) -> &[u32] {
        if self.widths.len() > 1 {
            &self.widths[..self.widths.len() - 1]
        } else {
            &self.widths
        }
    }

    /// `srcset` value for `widths` in `format`, e.g.
    /// `"a-800.webp 800w, a-1600.webp 1600w"`.
    pub fn srcset(&self, widths: &[u32], format: ImageFormat) -> String {
        widths
            .iter()
            .map(|w| format!("{} {}w", self.url(*w, format), w))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn grid_url(&self) -> String {
        self.url(self.smallest(), ImageFormat::Jpeg)
    }

    pub fn full_url(&self) -> String {
        self.url(self.largest(), ImageFormat::Jpeg)
    }
}

/// One playable source as the rendering surface will receive it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub src:    String,
    pub mime:   String,
    /// Vertical resolution of this tier, `None` for a direct `src`.
    pub height: Option<u32>,
}

impl VideoSource {
    pub fn direct(src: impl Into<String>) -> Self {
        let src = src.into();
        let mime = mime_for_video(&src).to_string();
        Self { src, mime, height: None }
    }
}

/// Height-tiered MP4 renditions derived from a `base` path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTiers")]
pub struct VideoRenditions {
    base:    String,
    /// Descending (highest bitrate first), deduplicated, never empty.
    heights: Vec<u32>,
}

impl TryFrom<RawTiers> for VideoRenditions {
    type Error = NoTiers;

    fn try_from(raw: RawTiers) -> Result<Self, Self::Error> {
        Self::new(raw.base.clone(), &raw.tiers).ok_or(NoTiers(raw.base))
    }
}

impl VideoRenditions {
    pub fn new(base: impl Into<String>, heights: &[u32]) -> Option<Self> {
        let mut heights: Vec<u32> = heights.iter().copied().filter(|h| *h > 0).collect();
        heights.sort_unstable_by(|a, b| b.cmp(a));
        heights.dedup();
        if heights.is_empty() {
            return None;
        }
        Some(Self { base: base.into(), heights })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    pub fn url(&self, height: u32) -> String {
        format!("{}-{}.mp4", self.base, height)
    }

    /// All tiers, high to low. The surface picks the first one it can play.
    pub fn sources(&self) -> Vec<VideoSource> {
        self.heights
            .iter()
            .map(|h| VideoSource {
                src:    self.url(*h),
                mime:   "video/mp4".to_string(),
                height: Some(*h),
            })
            .collect()
    }
}

/// Best-effort MIME type from a file extension. Unknown → `video/mp4`,
/// which every target surface treats as a hint rather than a gate.
pub fn mime_for_video(src: &str) -> &'static str {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let ext = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "webm" => "video/webm",
        "ogv" | "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        _ => "video/mp4",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_tiers_follow_naming_convention() {
        let r = ImageRenditions::new("media/kit-04", &DEFAULT_IMAGE_WIDTHS).unwrap();
        assert_eq!(r.url(800, ImageFormat::Webp), "media/kit-04-800.webp");
        assert_eq!(r.grid_url(), "media/kit-04-800.jpg");
        assert_eq!(r.full_url(), "media/kit-04-2400.jpg");
    }

    #[test]
    fn grid_never_offers_top_tier() {
        let r = ImageRenditions::new("a", &[2400, 800, 1600]).unwrap();
        assert_eq!(r.grid_widths(), &[800, 1600]);
        assert_eq!(r.srcset(r.grid_widths(), ImageFormat::Webp), "a-800.webp 800w, a-1600.webp 1600w");
    }

    #[test]
    fn single_tier_is_shared() {
        let r = ImageRenditions::new("a", &[1200]).unwrap();
        assert_eq!(r.grid_widths(), &[1200]);
        assert_eq!(r.grid_url(), r.full_url());
    }

    #[test]
    fn empty_tiers_rejected() {
        assert!(ImageRenditions::new("a", &[]).is_none());
        assert!(VideoRenditions::new("a", &[0]).is_none());
    }

    #[test]
    fn deserialized_sets_are_validated() {
        let err = serde_json::from_str::<ImageRenditions>(r#"{"base":"a","widths":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no non-zero tier"));
        assert!(serde_json::from_str::<VideoRenditions>(r#"{"base":"v","heights":[0]}"#).is_err());

        let r: VideoRenditions = serde_json::from_str(r#"{"base":"v","heights":[480,1080,480]}"#).unwrap();
        assert_eq!(r.heights(), &[1080, 480]);
        let r: ImageRenditions = serde_json::from_str(r#"{"base":"a","widths":[1600,800]}"#).unwrap();
        assert_eq!((r.base(), r.widths()), ("a", &[800, 1600][..]));
    }

    #[test]
    fn video_sources_high_to_low() {
        let r = VideoRenditions::new("v/kit-09", &[480, 1080, 720]).unwrap();
        let srcs: Vec<_> = r.sources().into_iter().map(|s| s.src).collect();
        assert_eq!(srcs, ["v/kit-09-1080.mp4", "v/kit-09-720.mp4", "v/kit-09-480.mp4"]);
    }

    #[test]
    fn direct_source_mime_from_extension() {
        assert_eq!(VideoSource::direct("clip.webm").mime, "video/webm");
        assert_eq!(VideoSource::direct("clip.MOV?x=1").mime, "video/quicktime");
        assert_eq!(VideoSource::direct("clip").mime, "video/mp4");
    }
}
