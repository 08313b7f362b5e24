// crates/storyreel-ui/src/surface.rs
//
// The rendering surface contract. The embedding host (a browser binding, the
// in-memory `DomSurface`, …) implements `Surface`; the gallery only ever emits
// tree-construction, observation and listener calls against it.
//
// Host → gallery traffic flows the other way as `SurfaceEvent`s, pushed into
// `GalleryApp::handle_event` directly or through the app's event channel.
//
// Click delivery: a host delivers a click to the NEAREST listening ancestor of
// the hit node (inclusive) and stops there, reporting both the listener and
// the original target. The backdrop check relies on `target == listener`.

/// Opaque handle to one node owned by the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Which observer a node is registered with. Each kind has its own margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObserverKind {
    /// Native video placeholders awaiting source attachment.
    LazyMedia,
    /// Stage sections, for active-tab tracking.
    StageSection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    Click,
    KeyDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAlign {
    Start,
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollMotion {
    Smooth,
    /// Used when the user asks for reduced motion.
    Instant,
}

impl ScrollMotion {
    /// Smooth unless the surface reports a reduced-motion preference.
    pub fn preferred<S: Surface + ?Sized>(surface: &S) -> Self {
        if surface.prefers_reduced_motion() {
            ScrollMotion::Instant
        } else {
            ScrollMotion::Smooth
        }
    }
}

/// Coarseness of the primary pointer (`(pointer: coarse)` in CSS terms).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerClass {
    #[default]
    Fine,
    Coarse,
}

/// One node's visibility change as reported by an observer. Only nodes whose
/// state changed appear in a batch; geometry is read back through
/// `Surface::top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub node:            NodeId,
    pub is_intersecting: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// A batch of visibility changes from one observer.
    Intersection { observer: ObserverKind, entries: Vec<IntersectionEntry> },
    /// Pointer activation delivered to `listener`; `target` is the hit node.
    Click { listener: NodeId, target: NodeId },
    /// Document-level key press (`"Escape"`, `"Enter"`, …).
    KeyDown { key: String },
}

pub trait Surface {
    /// Document root. Overlays are appended here; document-level listeners
    /// are registered on it.
    fn root(&self) -> NodeId;

    // ── Tree construction ────────────────────────────────────────────────────
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);
    /// Replace all children of `node` with a single text run.
    fn set_text(&mut self, node: NodeId, text: &str);
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    /// Detach every child of `node`. Detached media stops playing.
    fn clear_children(&mut self, node: NodeId);

    // ── Queries ──────────────────────────────────────────────────────────────
    fn tag(&self, node: NodeId) -> Option<String>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: NodeId) -> String;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    /// Mounted element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    /// Mounted elements carrying attribute `name`, in document order.
    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId>;

    // ── Observation & input ──────────────────────────────────────────────────
    /// Report `node`'s visibility to `kind`'s observer, firing `margin_px`
    /// before the node actually reaches the viewport.
    fn observe(&mut self, node: NodeId, kind: ObserverKind, margin_px: u32);
    fn unobserve(&mut self, node: NodeId, kind: ObserverKind);
    fn listen(&mut self, node: NodeId, kind: ListenerKind);

    // ── Viewport ─────────────────────────────────────────────────────────────
    fn scroll_into_view(&mut self, node: NodeId, align: ScrollAlign, motion: ScrollMotion);
    /// Current top edge of `node` relative to the viewport top, in px
    /// (negative once scrolled above). Read at call time, never cached.
    fn top(&self, node: NodeId) -> f32;
    fn pointer_class(&self) -> PointerClass;
    /// `(prefers-reduced-motion: reduce)` in CSS terms.
    fn prefers_reduced_motion(&self) -> bool;
}

/// First descendant of `node` (depth-first, excluding `node`) whose tag is
/// one of `tags`.
pub fn find_descendant<S: Surface + ?Sized>(surface: &S, node: NodeId, tags: &[&str]) -> Option<NodeId> {
    for child in surface.children(node) {
        if surface.tag(child).is_some_and(|t| tags.contains(&t.as_str())) {
            return Some(child);
        }
        if let Some(found) = find_descendant(surface, child, tags) {
            return Some(found);
        }
    }
    None
}
