// crates/storyreel-core/src/diagnostics.rs
//
// Every problem that skips an item, drops a card or fails the view ends up
// here as data AND as a `tracing` event. Nothing is swallowed silently.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    UnrecognizedType,
    MissingSource,
    UnresolvableVideoId,
    MalformedRecord,
    /// Neither the item's stage mount point nor the terminal one exists.
    MountMissing,
    /// The nav strip element is absent, so no tabs were built.
    NavStripMissing,
    /// The feed itself could not be fetched or parsed.
    FeedUnavailable,
}

impl DiagnosticKind {
    /// Stable kebab-case code, suitable for logs and test assertions.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnrecognizedType    => "unrecognized-type",
            DiagnosticKind::MissingSource       => "missing-source",
            DiagnosticKind::UnresolvableVideoId => "unresolvable-video-id",
            DiagnosticKind::MalformedRecord     => "malformed-record",
            DiagnosticKind::MountMissing        => "mount-missing",
            DiagnosticKind::NavStripMissing     => "nav-strip-missing",
            DiagnosticKind::FeedUnavailable     => "feed-unavailable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind:    DiagnosticKind,
    /// Feed position of the affected item, when there is one.
    pub item:    Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, item: Option<usize>, message: impl Into<String>) -> Self {
        Self { kind, item, message: message.into() }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.item {
            Some(i) => write!(f, "[{}] item {}: {}", self.kind.code(), i, self.message),
            None    => write!(f, "[{}] {}", self.kind.code(), self.message),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            code = diagnostic.kind.code(),
            item = ?diagnostic.item,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Diagnostics recorded for the item at feed position `index`.
    pub fn for_item(&self, index: usize) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.item == Some(index))
    }
}
