// crates/storyreel-ui/src/modules/nav.rs
//
// Stage Navigation Builder & Active-Section Tracker.
//
// Build: scan mounted nodes carrying `data-stage`, derive one tab per section
// and write the tabs into the nav strip. Tab order is document order.
//
//   key   = data-stage > id > slug(label)
//   label = data-label > first h1..h6 text > key
//
// A section that yields neither a key nor a label is skipped.
//
// Track: section visibility batches go through `NavState`, which measures the
// live top of every intersecting section through `Surface::top`; when the
// winner changes, only its tab carries `aria-current` and the tab is scrolled
// into view inside the strip.

use std::collections::HashMap;

use storyreel_core::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use storyreel_core::state::NavState;
use storyreel_core::GalleryConfig;

use super::{ClickRoute, RouteTable};
use crate::helpers::format::{collapse_whitespace, slugify};
use crate::surface::{
    find_descendant, IntersectionEntry, ListenerKind, NodeId, ObserverKind, ScrollAlign,
    ScrollMotion, Surface,
};
use crate::theme;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavTab {
    pub key:     String,
    pub label:   String,
    pub section: NodeId,
    pub button:  NodeId,
}

#[derive(Default)]
pub struct StageNav {
    tabs:       Vec<NavTab>,
    by_section: HashMap<NodeId, usize>,
    state:      NavState,
    tracking:   bool,
}

impl StageNav {
    /// Scan the page and build the tab strip. Without a strip the tabs still
    /// exist logically (for tracking) but nothing is rendered.
    pub fn build<S: Surface>(
        surface:     &mut S,
        routes:      &mut RouteTable,
        config:      &GalleryConfig,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let strip = surface.element_by_id(&config.nav_strip_id);
        if strip.is_none() {
            diagnostics.record(Diagnostic::new(
                DiagnosticKind::NavStripMissing,
                None,
                format!("no element with id \"{}\"", config.nav_strip_id),
            ));
        }

        let mut tabs = Vec::new();
        for section in surface.elements_with_attribute("data-stage") {
            let Some((key, label)) = describe_section(surface, section) else {
                tracing::debug!(?section, "stage section without key or label skipped");
                continue;
            };

            let index = tabs.len();
            let button = surface.create_element("button");
            surface.set_attribute(button, "type", "button");
            surface.set_attribute(button, "class", theme::TAB);
            surface.set_attribute(button, "data-target", &key);
            surface.set_text(button, &label);
            if let Some(strip) = strip {
                surface.append_child(strip, button);
            }
            surface.listen(button, ListenerKind::Click);
            routes.insert(button, ClickRoute::NavTab(index));

            tabs.push(NavTab { key, label, section, button });
        }

        let mut nav = Self {
            by_section: tabs.iter().enumerate().map(|(i, t)| (t.section, i)).collect(),
            state:      NavState::new(tabs.len()),
            tabs,
            tracking:   config.track_active_stage,
        };

        if nav.tracking {
            for tab in &nav.tabs {
                surface.observe(tab.section, ObserverKind::StageSection, 0);
            }
        }
        if let Some(first) = nav.state.current() {
            nav.mark_current(surface, first);
        }

        tracing::info!(tabs = nav.tabs.len(), tracking = nav.tracking, "stage nav built");
        nav
    }

    pub fn tabs(&self) -> &[NavTab] {
        &self.tabs
    }

    pub fn current(&self) -> Option<usize> {
        self.state.current()
    }

    pub fn section(&self, index: usize) -> Option<NodeId> {
        self.tabs.get(index).map(|t| t.section)
    }

    /// Feed one observer batch. Entries for nodes that are not tracked
    /// sections are ignored.
    pub fn on_intersection<S: Surface>(&mut self, surface: &mut S, entries: &[IntersectionEntry]) {
        if !self.tracking {
            return;
        }
        let changes: Vec<_> = entries
            .iter()
            .filter_map(|e| self.by_section.get(&e.node).map(|i| (*i, e.is_intersecting)))
            .collect();

        let tabs = &self.tabs;
        let live = &*surface;
        let changed = self.state.apply(changes, |i| live.top(tabs[i].section));

        if let Some(winner) = changed {
            tracing::debug!(stage = %self.tabs[winner].key, "active stage changed");
            self.mark_current(surface, winner);
            let motion = ScrollMotion::preferred(surface);
            surface.scroll_into_view(self.tabs[winner].button, ScrollAlign::Nearest, motion);
        }
    }

    /// Tab activation: bring the owning section to the top of the viewport.
    pub fn scroll_to<S: Surface>(&self, surface: &mut S, index: usize) {
        if let Some(tab) = self.tabs.get(index) {
            let motion = ScrollMotion::preferred(surface);
            surface.scroll_into_view(tab.section, ScrollAlign::Start, motion);
        }
    }

    fn mark_current<S: Surface>(&self, surface: &mut S, current: usize) {
        for (i, tab) in self.tabs.iter().enumerate() {
            if i == current {
                surface.set_attribute(tab.button, "aria-current", "true");
                surface.set_attribute(tab.button, "class", theme::TAB_CURRENT);
            } else {
                surface.remove_attribute(tab.button, "aria-current");
                surface.set_attribute(tab.button, "class", theme::TAB);
            }
        }
    }
}

fn describe_section<S: Surface>(surface: &S, section: NodeId) -> Option<(String, String)> {
    let nonblank = |v: Option<String>| v.map(|s| collapse_whitespace(&s)).filter(|s| !s.is_empty());

    let explicit = nonblank(surface.attribute(section, "data-label"));
    let heading = find_descendant(surface, section, HEADINGS)
        .and_then(|h| nonblank(Some(surface.text_content(h))));
    let label = explicit.or(heading);

    let key = nonblank(surface.attribute(section, "data-stage"))
        .or_else(|| nonblank(surface.attribute(section, "id")))
        .or_else(|| label.as_deref().map(slugify).filter(|s| !s.is_empty()))?;

    let label = label.unwrap_or_else(|| key.clone());
    Some((key, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomSurface;
    use crate::surface::SurfaceEvent;
    use pretty_assertions::assert_eq;

    fn section(dom: &mut DomSurface, stage: &str, heading: Option<&str>) -> NodeId {
        let s = dom.create_element("section");
        dom.set_attribute(s, "data-stage", stage);
        if let Some(h) = heading {
            let h2 = dom.create_element("h2");
            dom.set_text(h2, h);
            dom.append_child(s, h2);
        }
        let root = dom.root();
        dom.append_child(root, s);
        s
    }

    fn strip(dom: &mut DomSurface) -> NodeId {
        let nav = dom.create_element("nav");
        dom.set_attribute(nav, "id", "stage-nav");
        let root = dom.root();
        dom.append_child(root, nav);
        nav
    }

    #[test]
    fn labels_fall_back_to_key_and_blank_sections_skip() {
        let mut dom = DomSurface::new();
        strip(&mut dom);
        section(&mut dom, "each_other", Some("  Each\n Other "));
        section(&mut dom, "first_moves", None);
        let blank = dom.create_element("section");
        dom.set_attribute(blank, "data-stage", " ");
        let root = dom.root();
        dom.append_child(root, blank);
        let titled = section(&mut dom, "", Some("Ready for Launch"));

        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let nav = StageNav::build(&mut dom, &mut routes, &GalleryConfig::default(), &mut diags);

        let got: Vec<_> = nav.tabs().iter().map(|t| (t.key.as_str(), t.label.as_str())).collect();
        assert_eq!(got, [("each_other", "Each Other"), ("first_moves", "first_moves"), ("ready_for_launch", "Ready for Launch")]);
        assert_eq!(nav.section(2), Some(titled));
        assert!(diags.is_empty());
    }

    #[test]
    fn first_tab_current_on_load() {
        let mut dom = DomSurface::new();
        strip(&mut dom);
        section(&mut dom, "a", None);
        section(&mut dom, "b", None);
        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let nav = StageNav::build(&mut dom, &mut routes, &GalleryConfig::default(), &mut diags);

        assert_eq!(nav.current(), Some(0));
        assert_eq!(dom.attribute(nav.tabs()[0].button, "aria-current").as_deref(), Some("true"));
        assert_eq!(dom.attribute(nav.tabs()[1].button, "aria-current"), None);
        assert!(dom.is_observed(nav.tabs()[1].section, ObserverKind::StageSection));
    }

    #[test]
    fn tracking_disabled_ignores_batches() {
        let mut dom = DomSurface::new();
        strip(&mut dom);
        section(&mut dom, "a", None);
        let b = section(&mut dom, "b", None);
        let cfg = GalleryConfig { track_active_stage: false, ..GalleryConfig::default() };
        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let mut nav = StageNav::build(&mut dom, &mut routes, &cfg, &mut diags);

        assert!(!dom.is_observed(b, ObserverKind::StageSection));
        nav.on_intersection(&mut dom, &[IntersectionEntry { node: b, is_intersecting: true }]);
        assert_eq!(nav.current(), Some(0));
    }

    #[test]
    fn missing_strip_is_reported() {
        let mut dom = DomSurface::new();
        section(&mut dom, "a", None);
        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let nav = StageNav::build(&mut dom, &mut routes, &GalleryConfig::default(), &mut diags);

        assert_eq!(nav.tabs().len(), 1);
        assert_eq!(diags.count(DiagnosticKind::NavStripMissing), 1);
    }

    #[test]
    fn tab_click_scrolls_section_to_start() {
        let mut dom = DomSurface::new();
        strip(&mut dom);
        let a = section(&mut dom, "a", None);
        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let nav = StageNav::build(&mut dom, &mut routes, &GalleryConfig::default(), &mut diags);

        nav.scroll_to(&mut dom, 0);
        let req = dom.scroll_requests().last().unwrap();
        assert_eq!((req.node, req.align, req.motion), (a, ScrollAlign::Start, ScrollMotion::Smooth));
    }

    #[test]
    fn reduced_motion_scrolls_instantly() {
        let mut dom = DomSurface::new();
        dom.set_reduced_motion(true);
        strip(&mut dom);
        section(&mut dom, "a", None);
        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let nav = StageNav::build(&mut dom, &mut routes, &GalleryConfig::default(), &mut diags);

        nav.scroll_to(&mut dom, 0);
        assert_eq!(dom.scroll_requests().last().unwrap().motion, ScrollMotion::Instant);
    }

    #[test]
    fn tall_section_scrolled_past_loses_to_live_tops() {
        let mut dom = DomSurface::new();
        strip(&mut dom);
        let sections: Vec<_> = ["s0", "s1", "s2", "s3"].iter().map(|k| section(&mut dom, k, None)).collect();
        for (node, (offset, height)) in sections.iter().zip([(0.0, 1000.0), (1000.0, 100.0), (1100.0, 400.0), (1500.0, 600.0)]) {
            dom.set_layout(*node, offset, height);
        }
        let (mut routes, mut diags) = (RouteTable::new(), Diagnostics::new());
        let mut nav = StageNav::build(&mut dom, &mut routes, &GalleryConfig::default(), &mut diags);

        // Each step brings the next section's top to 799px; s0 never leaves.
        for y in [0.0, 201.0, 301.0, 701.0] {
            for event in dom.scroll_to(y) {
                if let SurfaceEvent::Intersection { entries, .. } = event {
                    nav.on_intersection(&mut dom, &entries);
                }
            }
        }

        assert_eq!(dom.top(sections[0]), -701.0);
        assert_eq!(nav.current(), Some(1));
        assert_eq!(dom.attribute(nav.tabs()[1].button, "aria-current").as_deref(), Some("true"));
        assert_eq!(dom.attribute(nav.tabs()[0].button, "aria-current"), None);
    }
}
