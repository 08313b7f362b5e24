// crates/storyreel-core/src/state.rs
// Pure overlay and navigation state. No surface types, no node handles.
// storyreel-ui owns one LightboxState and one NavState per mounted gallery and
// mirrors them onto the page; tests drive these directly.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::helpers::geometry::closest_to_top;
use crate::helpers::renditions::VideoSource;
use crate::media_types::{CardMedia, CardViewModel, ImageView};

// ── Lightbox ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LightboxMedia {
    Image    { url: String, alt: String },
    Embedded { video_id: String, embed_url: String },
    Native   { sources: Vec<VideoSource>, poster: Option<String> },
}

/// Text block under the lightbox media. Never constructed empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightboxText {
    pub title:   Option<String>,
    pub story:   Option<String>,
    pub details: Option<Vec<String>>,
}

/// Everything the lightbox shows for one card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightboxContent {
    pub card:  Uuid,
    pub media: LightboxMedia,
    /// `None` when the card has no title, story or details.
    pub text:  Option<LightboxText>,
}

/// Full-resolution image URL for the lightbox.
///
/// Precedence: URL stashed on the originating card > the view-model's
/// `full_url` (itself `full > base largest tier > src > thumb`).
pub fn resolve_full_url(view: &ImageView, stashed: Option<&str>) -> String {
    stashed
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| view.full_url.clone())
}

impl LightboxContent {
    pub fn for_card(card: &CardViewModel, stashed_full: Option<&str>) -> Self {
        let media = match &card.media {
            CardMedia::Image(img) => LightboxMedia::Image {
                url: resolve_full_url(img, stashed_full),
                alt: img.alt.clone(),
            },
            CardMedia::EmbeddedVideo(e) => LightboxMedia::Embedded {
                video_id:  e.video_id.clone(),
                embed_url: e.embed_url.clone(),
            },
            CardMedia::NativeVideo(v) => LightboxMedia::Native {
                sources: v.all_sources(),
                poster:  v.poster.clone(),
            },
        };
        let text = card.has_text().then(|| LightboxText {
            title:   card.title.clone(),
            story:   card.story.clone(),
            details: card.details.clone(),
        });
        Self { card: card.id, media, text }
    }
}

/// `Closed | Open(content)`. One per controller; opening while open replaces
/// the content in a single transition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum LightboxState {
    #[default]
    Closed,
    Open(LightboxContent),
}

impl LightboxState {
    pub fn is_open(&self) -> bool {
        matches!(self, LightboxState::Open(_))
    }

    pub fn content(&self) -> Option<&LightboxContent> {
        match self {
            LightboxState::Open(c) => Some(c),
            LightboxState::Closed  => None,
        }
    }

    pub fn open_card(&self) -> Option<Uuid> {
        self.content().map(|c| c.card)
    }
}

// ── Stage navigation ─────────────────────────────────────────────────────────

/// Active-tab tracker. Indexes are tab positions.
///
/// The first tab is current from construction until a visibility signal says
/// otherwise. After that, the current tab is the intersecting section whose
/// top is closest to the viewport top. When nothing intersects (e.g. the page
/// is scrolled into a footer) the last current tab is kept.
///
/// Only intersection flags are remembered. Observer batches carry just the
/// sections that changed, so tops are always measured afresh for every
/// intersecting section when a batch arrives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavState {
    intersecting: Vec<bool>,
    current:      Option<usize>,
}

impl NavState {
    pub fn new(tab_count: usize) -> Self {
        Self {
            intersecting: vec![false; tab_count],
            current:      (tab_count > 0).then_some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.intersecting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersecting.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Apply a batch of `(tab index, intersecting)` changes, then pick the
    /// winner among all intersecting sections using `top_of(index)`, the
    /// section's top edge relative to the viewport top right now.
    ///
    /// Returns the new current index when it changed, `None` otherwise.
    /// Out-of-range indexes are ignored.
    pub fn apply<I, F>(&mut self, changes: I, top_of: F) -> Option<usize>
    where
        I: IntoIterator<Item = (usize, bool)>,
        F: Fn(usize) -> f32,
    {
        for (index, intersecting) in changes {
            if let Some(slot) = self.intersecting.get_mut(index) {
                *slot = intersecting;
            }
        }

        let winner = closest_to_top(
            self.intersecting
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(i, _)| (i, top_of(i))),
        )?;

        if self.current == Some(winner) {
            return None;
        }
        self.current = Some(winner);
        Some(winner)
    }
}
