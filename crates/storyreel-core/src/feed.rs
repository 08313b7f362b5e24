// crates/storyreel-core/src/feed.rs
//
// Feed document parsing and the per-run summary.
//
// Fetching is someone else's job; this module only turns already-fetched text
// into records. Two failure levels:
//   whole document: not JSON, or not an array         → FeedError (view fails)
//   single element: not an object, wrong field types  → Rejection::Malformed (item skipped)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::classify::{ClassifiedFeed, Rejection};
use crate::diagnostics::Diagnostics;
use crate::media_types::{MediaItem, MediaKind};

/// One element of the feed array: a usable record or the reason it is not.
pub type FeedRecord = Result<MediaItem, Rejection>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed could not be fetched: {0}")]
    Fetch(String),
    #[error("feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed must be a JSON array of media records, found {0}")]
    NotAnArray(&'static str),
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a feed document into records, preserving feed order.
pub fn parse_feed(text: &str) -> Result<Vec<FeedRecord>, FeedError> {
    let doc: Value = serde_json::from_str(text)?;
    let Value::Array(elements) = doc else {
        return Err(FeedError::NotAnArray(json_type(&doc)));
    };

    let records = elements
        .into_iter()
        .map(|element| {
            if !element.is_object() {
                return Err(Rejection::Malformed(format!("found {}", json_type(&element))));
            }
            serde_json::from_value::<MediaItem>(element)
                .map_err(|e| Rejection::Malformed(e.to_string()))
        })
        .collect();
    Ok(records)
}

/// Counts for one render pass, printed by the binary and logged by the app.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSummary {
    pub records:         usize,
    pub images:          usize,
    pub native_videos:   usize,
    pub embedded_videos: usize,
    pub rejected:        usize,
    /// `(stage key, mounted card count)` in stage order. Cards that fell
    /// back to another stage's mount count there; dropped cards not at all.
    pub per_stage:       Vec<(String, usize)>,
}

impl FeedSummary {
    /// Per-kind counts; `per_stage` starts empty and is filled by
    /// `count_mounted` as cards land.
    pub fn new(classified: &ClassifiedFeed) -> Self {
        let count = |kind: MediaKind| classified.cards.iter().filter(|c| c.kind() == kind).count();
        Self {
            records:         classified.total,
            images:          count(MediaKind::Image),
            native_videos:   count(MediaKind::NativeVideo),
            embedded_videos: count(MediaKind::EmbeddedVideo),
            rejected:        classified.total - classified.cards.len(),
            per_stage:       Vec::new(),
        }
    }

    /// Add `n` mounted cards to `key`, listing the stage on first sight.
    pub fn count_mounted(&mut self, key: &str, n: usize) {
        match self.per_stage.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += n,
            None => self.per_stage.push((key.to_string(), n)),
        }
    }

    /// Multi-line human summary followed by any diagnostics.
    pub fn render(&self, diagnostics: &Diagnostics) -> String {
        let mut out = format!(
            "Records: {}  | images: {}  | videos: {}  | embeds: {}  | rejected: {}\n",
            self.records, self.images, self.native_videos, self.embedded_videos, self.rejected,
        );
        for (key, n) in &self.per_stage {
            out.push_str(&format!("  {key}: {n}\n"));
        }
        for d in diagnostics.iter() {
            out.push_str(&format!("  ! {d}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_records_parses_in_order() {
        let recs = parse_feed(r#"[{"type":"image","src":"a.jpg"},{"type":"video","src":"b.mp4"}]"#).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].as_ref().unwrap().src(), Some("b.mp4"));
    }

    #[test]
    fn non_object_element_is_a_per_item_rejection() {
        let recs = parse_feed(r#"[{"type":"image","src":"a.jpg"}, 7, {"type":"image","title":5}]"#).unwrap();
        assert!(recs[0].is_ok());
        assert_eq!(recs[1], Err(Rejection::Malformed("found a number".into())));
        assert!(matches!(recs[2], Err(Rejection::Malformed(_))));
    }

    #[test]
    fn document_level_failures() {
        assert!(matches!(parse_feed("{not json"), Err(FeedError::Json(_))));
        assert!(matches!(parse_feed(r#"{"items":[]}"#), Err(FeedError::NotAnArray("an object"))));
    }

    #[test]
    fn mounted_counts_accumulate_in_first_seen_order() {
        let mut summary = FeedSummary::default();
        summary.count_mounted("first_moves", 0);
        summary.count_mounted("ready_for_launch", 2);
        summary.count_mounted("first_moves", 1);
        summary.count_mounted("ready_for_launch", 1);
        assert_eq!(
            summary.per_stage,
            vec![("first_moves".to_string(), 1), ("ready_for_launch".to_string(), 3)],
        );
    }

    #[test]
    fn empty_feed_is_fine() {
        assert!(parse_feed("[]").unwrap().is_empty());
    }
}
