// crates/storyreel-core/src/config.rs
//
// Site-level knobs. Every field has a default so an empty (or missing) config
// file renders the stock kitten page.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::helpers::renditions::{DEFAULT_IMAGE_WIDTHS, DEFAULT_VIDEO_HEIGHTS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path:   String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Stage that absorbs items with a missing or unmountable stage key.
    pub terminal_stage:     String,
    /// Mount point id for stage `k` is `{mount_prefix}{k}`.
    pub mount_prefix:       String,
    /// Element replaced by the apology when the feed cannot be loaded.
    pub gallery_root_id:    String,
    /// Horizontally scrollable strip the stage tabs are built into.
    pub nav_strip_id:       String,
    /// Pre-trigger margin (px) for lazy video attachment.
    pub lazy_margin_px:     u32,
    /// Keep one tab marked current by observing section visibility.
    pub track_active_stage: bool,
    /// Player URL prefix; the video id is appended.
    pub embed_base:         String,
    /// Default poster prefix; `{thumbnail_base}{id}/hqdefault.jpg`.
    pub thumbnail_base:     String,
    pub image_widths:       Vec<u32>,
    pub video_heights:      Vec<u32>,
    pub apology:            String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            terminal_stage:     "ready_for_launch".to_string(),
            mount_prefix:       "gallery-".to_string(),
            gallery_root_id:    "gallery".to_string(),
            nav_strip_id:       "stage-nav".to_string(),
            lazy_margin_px:     200,
            track_active_stage: true,
            embed_base:         "https://www.youtube.com/embed/".to_string(),
            thumbnail_base:     "https://i.ytimg.com/vi/".to_string(),
            image_widths:       DEFAULT_IMAGE_WIDTHS.to_vec(),
            video_heights:      DEFAULT_VIDEO_HEIGHTS.to_vec(),
            apology:            "Sorry, the gallery could not be loaded right now. Please try again later.".to_string(),
        }
    }
}

impl GalleryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn mount_id(&self, stage_key: &str) -> String {
        format!("{}{}", self.mount_prefix, stage_key)
    }

    /// Autoplaying player URL for an embedded video.
    pub fn embed_url(&self, video_id: &str) -> String {
        format!("{}{}?autoplay=1&rel=0&playsinline=1", self.embed_base, video_id)
    }

    pub fn default_poster(&self, video_id: &str) -> String {
        format!("{}{}/hqdefault.jpg", self.thumbnail_base, video_id)
    }
}
