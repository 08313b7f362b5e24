// crates/storyreel-core/src/lib.rs
//
// Pure gallery data. No surface types, no node handles, no I/O beyond
// parsing text that someone else already fetched.
//
// Pipeline:
//   feed::parse_feed  →  classify::Classifier  →  stages::StageGrouper
//   →  (storyreel-ui mounts the cards)
//
// Everything downstream of the classifier works on `CardViewModel`, so the
// fallback chains for URLs and captions are resolved exactly once, here.

pub mod classify;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod feed;
pub mod helpers;
pub mod media_types;
pub mod stages;
pub mod state;

pub use classify::{ClassifiedFeed, Classifier, Rejection};
pub use commands::GalleryCommand;
pub use config::GalleryConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use feed::{parse_feed, FeedError, FeedRecord, FeedSummary};
pub use media_types::{CardMedia, CardViewModel, MediaItem, MediaKind};
pub use stages::{Stage, StageGrouper};
