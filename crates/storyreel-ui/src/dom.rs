// crates/storyreel-ui/src/dom.rs
//
// DomSurface: in-memory `Surface` host.
//
// Backs the `storyreel` binary (render a feed to static markup) and every
// integration test. It keeps a flat node arena, records observer and listener
// registrations, and logs scroll requests so tests can assert on them. Input
// is simulated through `click` / `key_down` / `scroll_to`, which produce the
// same `SurfaceEvent`s a browser binding would.
//
// Layout is opt-in: a node given a box through `set_layout` has a document
// offset and a height; `top` subtracts the current scroll position. Nodes
// without a box report a top of 0, like an unrendered element.

use std::collections::{BTreeMap, BTreeSet};

use crate::surface::{
    IntersectionEntry, ListenerKind, NodeId, ObserverKind, PointerClass, ScrollAlign,
    ScrollMotion, Surface, SurfaceEvent,
};

const DEFAULT_VIEWPORT_HEIGHT: f32 = 800.0;

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["img", "source", "br", "input", "meta", "hr"];

#[derive(Clone, Debug)]
enum NodeData {
    Element { tag: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    data:     NodeData,
    children: Vec<NodeId>,
    parent:   Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    offset: f32,
    height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollRequest {
    pub node:   NodeId,
    pub align:  ScrollAlign,
    pub motion: ScrollMotion,
}

pub struct DomSurface {
    nodes:          Vec<Node>,
    root:           NodeId,
    observed:       BTreeMap<(NodeId, ObserverKind), u32>,
    /// Last intersection state handed out per observation.
    reported:       BTreeMap<(NodeId, ObserverKind), bool>,
    listeners:      BTreeSet<(NodeId, ListenerKind)>,
    scrolls:        Vec<ScrollRequest>,
    pointer:        PointerClass,
    reduced_motion: bool,
    layout:         BTreeMap<NodeId, Bounds>,
    scroll_y:       f32,
    viewport:       f32,
}

impl Default for DomSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSurface {
    pub fn new() -> Self {
        let body = Node {
            data:     NodeData::Element { tag: "body".into(), attrs: Vec::new() },
            children: Vec::new(),
            parent:   None,
        };
        Self {
            nodes:          vec![body],
            root:           NodeId(0),
            observed:       BTreeMap::new(),
            reported:       BTreeMap::new(),
            listeners:      BTreeSet::new(),
            scrolls:        Vec::new(),
            pointer:        PointerClass::Fine,
            reduced_motion: false,
            layout:         BTreeMap::new(),
            scroll_y:       0.0,
            viewport:       DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    pub fn set_pointer_class(&mut self, pointer: PointerClass) {
        self.pointer = pointer;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    // ── Layout ───────────────────────────────────────────────────────────────

    /// Give `node` a box at document offset `offset` with `height`, in px.
    pub fn set_layout(&mut self, node: NodeId, offset: f32, height: f32) {
        self.layout.insert(node, Bounds { offset, height });
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport = height;
    }

    /// Scroll the document to `y` and return one intersection batch per
    /// observer whose nodes changed state. A node observed but never reported
    /// yet always appears, as a browser observer fires once on `observe`.
    pub fn scroll_to(&mut self, y: f32) -> Vec<SurfaceEvent> {
        self.scroll_y = y;

        let mut batches: BTreeMap<ObserverKind, Vec<IntersectionEntry>> = BTreeMap::new();
        for (&(node, kind), &margin) in &self.observed {
            let Some(bounds) = self.layout.get(&node) else { continue };
            let top = bounds.offset - self.scroll_y;
            let margin = margin as f32;
            let is_intersecting = top < self.viewport + margin && top + bounds.height > -margin;
            if self.reported.get(&(node, kind)) != Some(&is_intersecting) {
                batches.entry(kind).or_default().push(IntersectionEntry { node, is_intersecting });
            }
        }
        for (kind, entries) in &batches {
            for entry in entries {
                self.reported.insert((entry.node, *kind), entry.is_intersecting);
            }
        }

        batches
            .into_iter()
            .map(|(observer, entries)| SurfaceEvent::Intersection { observer, entries })
            .collect()
    }

    // ── Simulated input ──────────────────────────────────────────────────────

    /// Hit `target` and bubble to the nearest click listener, stopping there.
    /// `None` when nothing on the ancestor chain listens.
    pub fn click(&self, target: NodeId) -> Option<SurfaceEvent> {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if self.listeners.contains(&(node, ListenerKind::Click)) {
                return Some(SurfaceEvent::Click { listener: node, target });
            }
            cursor = self.node(node).and_then(|n| n.parent);
        }
        None
    }

    /// Key presses are document-level; `None` until something listens.
    pub fn key_down(&self, key: &str) -> Option<SurfaceEvent> {
        let any = self.listeners.iter().any(|(_, kind)| *kind == ListenerKind::KeyDown);
        any.then(|| SurfaceEvent::KeyDown { key: key.to_string() })
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    pub fn is_observed(&self, node: NodeId, kind: ObserverKind) -> bool {
        self.observed.contains_key(&(node, kind))
    }

    pub fn observer_margin(&self, node: NodeId, kind: ObserverKind) -> Option<u32> {
        self.observed.get(&(node, kind)).copied()
    }

    pub fn is_listening(&self, node: NodeId, kind: ListenerKind) -> bool {
        self.listeners.contains(&(node, kind))
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    /// True when `node` hangs off the root through its parent chain.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            if n == self.root {
                return true;
            }
            cursor = self.node(n).and_then(|n| n.parent);
        }
        false
    }

    /// Attached descendants of `node` with tag `tag`, in document order.
    pub fn descendants_with_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(node, &mut |id, n| {
            if matches!(&n.data, NodeData::Element { tag: t, .. } if t == tag) && id != node {
                out.push(id);
            }
        });
        out
    }

    /// Serialize the subtree under the root as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    pub fn node_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node { data, children: Vec::new(), parent: None });
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else { return };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
    }

    /// Pre-order walk over `node` and its descendants.
    fn walk(&self, node: NodeId, visit: &mut dyn FnMut(NodeId, &Node)) {
        let Some(n) = self.node(node) else { return };
        visit(node, n);
        for child in &n.children {
            self.walk(*child, visit);
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.node(node) else { return };
        match &n.data {
            NodeData::Text(t) => out.push_str(&escape(t, false)),
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push_str(&format!(" {k}=\"{}\"", escape(v, true)));
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for child in &n.children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Surface for DomSurface {
    fn root(&self) -> NodeId {
        self.root
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element { tag: tag.to_string(), attrs: Vec::new() })
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(Node { data: NodeData::Element { attrs, .. }, .. }) = self.node_mut(node) else {
            return;
        };
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(Node { data: NodeData::Element { attrs, .. }, .. }) = self.node_mut(node) {
            attrs.retain(|(k, _)| k != name);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        let run = self.push(NodeData::Text(text.to_string()));
        self.append_child(node, run);
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = self.node_mut(node).map(|n| std::mem::take(&mut n.children)).unwrap_or_default();
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
    }

    fn tag(&self, node: NodeId) -> Option<String> {
        match &self.node(node)?.data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            NodeData::Text(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.node(node)?.data {
            NodeData::Element { attrs, .. } => {
                attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
            }
            NodeData::Text(_) => None,
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.walk(node, &mut |_, n| {
            if let NodeData::Text(t) = &n.data {
                out.push_str(t);
            }
        });
        out
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|c| matches!(self.nodes[c.0].data, NodeData::Element { .. }))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut found = None;
        self.walk(self.root, &mut |node, _| {
            if found.is_none() && self.attribute(node, "id").as_deref() == Some(id) {
                found = Some(node);
            }
        });
        found
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |node, _| {
            if self.attribute(node, name).is_some() {
                out.push(node);
            }
        });
        out
    }

    fn observe(&mut self, node: NodeId, kind: ObserverKind, margin_px: u32) {
        self.observed.insert((node, kind), margin_px);
    }

    fn unobserve(&mut self, node: NodeId, kind: ObserverKind) {
        self.observed.remove(&(node, kind));
        self.reported.remove(&(node, kind));
    }

    fn listen(&mut self, node: NodeId, kind: ListenerKind) {
        self.listeners.insert((node, kind));
    }

    fn scroll_into_view(&mut self, node: NodeId, align: ScrollAlign, motion: ScrollMotion) {
        self.scrolls.push(ScrollRequest { node, align, motion });
    }

    fn top(&self, node: NodeId) -> f32 {
        self.layout.get(&node).map_or(0.0, |b| b.offset - self.scroll_y)
    }

    fn pointer_class(&self) -> PointerClass {
        self.pointer
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
