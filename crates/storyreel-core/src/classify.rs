// crates/storyreel-core/src/classify.rs
//
// Media Classifier: raw `MediaItem` → `CardViewModel`, or a `Rejection`.
//
// Rules, in order:
//   type "image"    needs one of src / thumb / base
//   type "video"    whose src (or base) is a third-party host URL is
//                   reclassified as an embedded video
//   type "video"    otherwise native; needs base or src
//   type "youtube"  needs an id from videoId or src
//   anything else   unrecognized-type
//
// Classification is total. Each record yields exactly one card or exactly one
// rejection, and a rejection never stops the records after it.

use thiserror::Error;
use uuid::Uuid;

use crate::config::GalleryConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::feed::FeedRecord;
use crate::helpers::renditions::{ImageRenditions, VideoRenditions};
use crate::helpers::youtube::{extract_video_id, is_third_party_host};
use crate::media_types::{
    CardMedia, CardViewModel, EmbeddedVideoView, ImageView, MediaItem, MediaKind,
    NativeVideoView, VideoOrigin,
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unrecognized media type {0:?}")]
    UnrecognizedType(String),
    #[error("{0} item has no usable source")]
    MissingSource(MediaKind),
    #[error("could not resolve a video id from {0:?}")]
    UnresolvableVideoId(String),
    #[error("record is not a media object: {0}")]
    Malformed(String),
}

impl Rejection {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Rejection::UnrecognizedType(_)    => DiagnosticKind::UnrecognizedType,
            Rejection::MissingSource(_)       => DiagnosticKind::MissingSource,
            Rejection::UnresolvableVideoId(_) => DiagnosticKind::UnresolvableVideoId,
            Rejection::Malformed(_)           => DiagnosticKind::MalformedRecord,
        }
    }

    pub fn into_diagnostic(self, index: usize) -> Diagnostic {
        Diagnostic::new(self.kind(), Some(index), self.to_string())
    }
}

/// Output of one classification pass over a whole feed.
#[derive(Clone, Debug, Default)]
pub struct ClassifiedFeed {
    /// Accepted cards in feed order.
    pub cards:       Vec<CardViewModel>,
    /// One entry per rejected record.
    pub diagnostics: Diagnostics,
    /// Records seen, accepted or not.
    pub total:       usize,
}

pub struct Classifier<'a> {
    config: &'a GalleryConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a GalleryConfig) -> Self {
        Self { config }
    }

    /// Classify every record. Rejections become diagnostics; the pass always
    /// runs to the end of the feed.
    pub fn classify_feed<I>(&self, records: I) -> ClassifiedFeed
    where
        I: IntoIterator<Item = FeedRecord>,
    {
        let mut out = ClassifiedFeed::default();
        for (index, record) in records.into_iter().enumerate() {
            out.total += 1;
            match record.and_then(|item| self.classify(index, &item)) {
                Ok(card) => {
                    tracing::debug!(index, kind = %card.kind(), id = %card.id, "classified");
                    out.cards.push(card);
                }
                Err(rejection) => out.diagnostics.record(rejection.into_diagnostic(index)),
            }
        }
        out
    }

    pub fn classify(&self, index: usize, item: &MediaItem) -> Result<CardViewModel, Rejection> {
        let tag = item.kind.as_deref().map(|t| t.trim().to_ascii_lowercase()).unwrap_or_default();

        let media = match tag.as_str() {
            "image"   => CardMedia::Image(self.image(item)?),
            "video"   => self.video(item)?,
            "youtube" => CardMedia::EmbeddedVideo(self.youtube(item)?),
            _ => {
                let raw = item.kind.clone().unwrap_or_default();
                return Err(Rejection::UnrecognizedType(raw));
            }
        };

        Ok(CardViewModel {
            id:        Uuid::new_v4(),
            index,
            stage:     item.stage_key().map(str::to_string),
            title:     item.title().map(str::to_string),
            story:     item.story().map(str::to_string),
            details:   item.details(),
            caption:   item.title().map(str::to_string),
            asset_key: item.asset_key().map(str::to_string),
            media,
        })
    }

    // ── Image ─────────────────────────────────────────────────────────────────

    fn image(&self, item: &MediaItem) -> Result<ImageView, Rejection> {
        let renditions = item
            .base()
            .and_then(|b| ImageRenditions::new(b, &self.config.image_widths));

        let grid_url = renditions
            .as_ref()
            .map(ImageRenditions::grid_url)
            .or_else(|| item.thumb().map(str::to_string))
            .or_else(|| item.src().map(str::to_string))
            .ok_or(Rejection::MissingSource(MediaKind::Image))?;

        let full_url = item
            .full()
            .map(str::to_string)
            .or_else(|| renditions.as_ref().map(ImageRenditions::full_url))
            .or_else(|| item.src().map(str::to_string))
            .or_else(|| item.thumb().map(str::to_string))
            .unwrap_or_else(|| grid_url.clone());

        let alt = item.alt().or(item.title()).unwrap_or_default().to_string();

        Ok(ImageView { grid_url, full_url, alt, renditions })
    }

    // ── Video ─────────────────────────────────────────────────────────────────

    fn video(&self, item: &MediaItem) -> Result<CardMedia, Rejection> {
        let hosted = [item.src(), item.base()]
            .into_iter()
            .flatten()
            .find(|s| is_third_party_host(s));

        if let Some(url) = hosted {
            tracing::debug!(url, "video record points at a third-party host; embedding");
            let id = item
                .video_id()
                .and_then(resolve_id)
                .or_else(|| extract_video_id(url))
                .ok_or_else(|| Rejection::UnresolvableVideoId(url.to_string()))?;
            return Ok(CardMedia::EmbeddedVideo(self.embedded(item, id)));
        }

        let origin = match item.base().and_then(|b| VideoRenditions::new(b, &self.config.video_heights)) {
            Some(renditions) => VideoOrigin::Renditions(renditions),
            None => match item.src() {
                Some(src) => VideoOrigin::Direct(src.to_string()),
                None      => return Err(Rejection::MissingSource(MediaKind::NativeVideo)),
            },
        };

        Ok(CardMedia::NativeVideo(NativeVideoView {
            origin,
            poster: item.poster().map(str::to_string),
        }))
    }

    fn youtube(&self, item: &MediaItem) -> Result<EmbeddedVideoView, Rejection> {
        if let Some(id) = item.video_id().and_then(resolve_id) {
            return Ok(self.embedded(item, id));
        }
        if let Some(id) = item.src().and_then(extract_video_id) {
            return Ok(self.embedded(item, id));
        }
        match item.src().or(item.video_id()) {
            Some(given) => Err(Rejection::UnresolvableVideoId(given.to_string())),
            None        => Err(Rejection::MissingSource(MediaKind::EmbeddedVideo)),
        }
    }

    fn embedded(&self, item: &MediaItem, video_id: String) -> EmbeddedVideoView {
        EmbeddedVideoView {
            poster_url: item
                .poster()
                .map(str::to_string)
                .unwrap_or_else(|| self.config.default_poster(&video_id)),
            embed_url:  self.config.embed_url(&video_id),
            video_id,
        }
    }
}

/// A `videoId` field is usually a bare id, but feeds in the wild also paste
/// whole URLs into it.
fn resolve_id(raw: &str) -> Option<String> {
    let bare = !raw.is_empty()
        && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if bare {
        Some(raw.to_string())
    } else {
        extract_video_id(raw)
    }
}
