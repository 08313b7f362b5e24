// crates/storyreel-ui/tests/gallery_flow.rs
//
// End-to-end flows over the in-memory surface: render a feed into the stage
// page, then drive clicks, key presses and observer batches through the app.

use pretty_assertions::assert_eq;
use uuid::Uuid;

use storyreel_core::{parse_feed, DiagnosticKind, FeedError, GalleryConfig, MediaKind};
use storyreel_ui::{
    build_stage_page, DomSurface, GalleryApp, IntersectionEntry, NodeId, ObserverKind,
    PointerClass, ScrollAlign, ScrollMotion, Surface, SurfaceEvent,
};

const STAGES: [&str; 3] = ["each_other", "first_moves", "ready_for_launch"];

fn app_with(stages: &[&str], feed: &str) -> GalleryApp<DomSurface> {
    let config = GalleryConfig::default();
    let mut dom = DomSurface::new();
    let keys: Vec<String> = stages.iter().map(|s| s.to_string()).collect();
    build_stage_page(&mut dom, &config, &keys);
    let mut app = GalleryApp::new(dom, config);
    app.mount_feed(parse_feed(feed)).expect("feed mounts");
    app
}

fn card_id(app: &GalleryApp<DomSurface>, index: usize) -> Uuid {
    app.cards_in_feed_order()[index].id
}

fn click(app: &mut GalleryApp<DomSurface>, node: NodeId) {
    let event = app.surface().click(node).expect("a listener handles the click");
    app.handle_event(event);
}

fn popup_button(app: &GalleryApp<DomSurface>, card: Uuid) -> NodeId {
    let root = app.card_node(card).unwrap();
    app.surface().descendants_with_tag(root, "button")[0]
}

fn lightbox_html(app: &GalleryApp<DomSurface>) -> String {
    app.surface().node_html(app.lightbox().content_node().unwrap())
}

#[test]
fn stage_order_follows_feed_with_terminal_default() {
    let mut dom = DomSurface::new();
    let config = GalleryConfig::default();
    let keys: Vec<String> = STAGES.iter().map(|s| s.to_string()).collect();
    build_stage_page(&mut dom, &config, &keys);
    let mut app = GalleryApp::new(dom, config);

    let report = app
        .mount_feed(parse_feed(
            r#"[
                {"type":"image","src":"a.jpg","stage":"each_other"},
                {"type":"image","src":"b.jpg","stage":"first_moves"},
                {"type":"image","src":"c.jpg"}
            ]"#,
        ))
        .unwrap();

    let per_stage: Vec<_> = report.summary.per_stage.iter().map(|(k, n)| (k.as_str(), *n)).collect();
    assert_eq!(per_stage, [("each_other", 1), ("first_moves", 1), ("ready_for_launch", 1)]);
    assert_eq!(report.mounted, 3);

    let terminal = app.surface().element_by_id("gallery-ready_for_launch").unwrap();
    assert!(app.surface().node_html(terminal).contains("c.jpg"));
}

#[test]
fn rejected_records_do_not_stop_the_batch() {
    let app = app_with(
        &STAGES,
        r#"[
            {"type":"gif","src":"a.gif"},
            {"type":"youtube","src":"https://example.com/watch?v=abc123"},
            {"type":"image"},
            {"type":"youtube","src":"https://youtu.be/abc123"}
        ]"#,
    );
    let d = app.diagnostics();
    assert_eq!(d.count(DiagnosticKind::UnrecognizedType), 1);
    assert_eq!(d.count(DiagnosticKind::UnresolvableVideoId), 1);
    assert_eq!(d.count(DiagnosticKind::MissingSource), 1);
    assert_eq!(app.cards_in_feed_order().len(), 1);
    assert_eq!(app.cards_in_feed_order()[0].kind(), MediaKind::EmbeddedVideo);
}

#[test]
fn second_section_near_viewport_top_is_the_only_current_tab() {
    let mut app = app_with(&STAGES, "[]");
    let sections: Vec<NodeId> = app.nav().tabs().iter().map(|t| t.section).collect();
    assert_eq!(sections.len(), 3);

    let dom = app.surface_mut();
    dom.set_layout(sections[0], 0.0, 664.0);
    dom.set_layout(sections[1], 664.0, 886.0);
    dom.set_layout(sections[2], 1550.0, 700.0);
    for event in app.surface_mut().scroll_to(640.0) {
        app.handle_event(event);
    }
    assert_eq!(app.surface().top(sections[1]), 24.0);

    let current: Vec<usize> = app
        .nav()
        .tabs()
        .iter()
        .enumerate()
        .filter(|(_, t)| app.surface().attribute(t.button, "aria-current").is_some())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(current, [1]);

    let last = app.surface().scroll_requests().last().unwrap();
    assert_eq!(last.node, app.nav().tabs()[1].button);
    assert_eq!((last.align, last.motion), (ScrollAlign::Nearest, ScrollMotion::Smooth));
}

#[test]
fn tab_click_scrolls_its_section() {
    let mut app = app_with(&STAGES, "[]");
    let tab = app.nav().tabs()[2].clone();
    click(&mut app, tab.button);

    let last = app.surface().scroll_requests().last().unwrap();
    assert_eq!((last.node, last.align, last.motion), (tab.section, ScrollAlign::Start, ScrollMotion::Smooth));
}

#[test]
fn opening_b_over_a_leaves_only_b_mounted() {
    let mut app = app_with(
        &STAGES,
        r#"[
            {"type":"video","base":"v/zoomies","poster":"v/zoomies.jpg","title":"Zoomies"},
            {"type":"image","base":"m/kit-04","title":"Kit"}
        ]"#,
    );
    let (a, b) = (card_id(&app, 0), card_id(&app, 1));

    let popup = popup_button(&app, a);
    click(&mut app, popup);
    assert_eq!(app.lightbox().state().open_card(), Some(a));
    let content = app.lightbox().content_node().unwrap();
    let a_video = app.surface().descendants_with_tag(content, "video")[0];
    assert_eq!(app.surface().descendants_with_tag(a_video, "source").len(), 3);

    let b_root = app.card_node(b).unwrap();
    click(&mut app, b_root);

    assert_eq!(app.lightbox().state().open_card(), Some(b));
    assert!(!app.surface().is_attached(a_video));
    assert!(app.surface().descendants_with_tag(content, "video").is_empty());
    let html = lightbox_html(&app);
    assert!(html.contains("m/kit-04-2400.jpg"));
    assert!(html.contains("<h3>Kit</h3>"));
}

#[test]
fn escape_and_backdrop_close_with_nothing_left_mounted() {
    let mut app = app_with(&STAGES, r#"[{"type":"image","src":"a.jpg","story":"Tiny."}]"#);
    let card = app.card_node(card_id(&app, 0)).unwrap();

    // Escape.
    click(&mut app, card);
    assert!(app.lightbox().is_open());
    let esc = app.surface().key_down("Escape").unwrap();
    app.handle_event(esc);
    assert!(!app.lightbox().is_open());
    let content = app.lightbox().content_node().unwrap();
    assert!(app.surface().children(content).is_empty());

    // A click inside the dialog bubbles to the overlay but is not a backdrop click.
    click(&mut app, card);
    let inner = app.surface().children(content)[0];
    click(&mut app, inner);
    assert!(app.lightbox().is_open());

    // Backdrop.
    let overlay = app.lightbox().root().unwrap();
    click(&mut app, overlay);
    assert!(!app.lightbox().is_open());
    assert!(app.surface().children(content).is_empty());

    // Escape while closed changes nothing.
    let esc = app.surface().key_down("Escape").unwrap();
    app.handle_event(esc);
    assert!(!app.lightbox().is_open());
}

#[test]
fn close_button_closes() {
    let mut app = app_with(&STAGES, r#"[{"type":"image","src":"a.jpg"}]"#);
    let card = app.card_node(card_id(&app, 0)).unwrap();
    click(&mut app, card);
    let close = app.lightbox().close_button().unwrap();
    click(&mut app, close);
    assert!(!app.lightbox().is_open());
}

#[test]
fn lazy_sources_attach_once_on_first_visibility() {
    let mut app = app_with(&STAGES, r#"[{"type":"video","base":"v/zoomies"}]"#);
    let id = card_id(&app, 0);
    let video = app.lazy_node(id).unwrap();
    assert!(app.surface().children(video).is_empty());
    assert_eq!(app.surface().observer_margin(video, ObserverKind::LazyMedia), Some(200));

    let signal = |visible: bool| SurfaceEvent::Intersection {
        observer: ObserverKind::LazyMedia,
        entries:  vec![IntersectionEntry { node: video, is_intersecting: visible }],
    };

    app.handle_event(signal(false));
    assert!(app.surface().children(video).is_empty());

    app.handle_event(signal(true));
    app.handle_event(signal(true));
    app.handle_event(signal(true));

    let sources = app.surface().children(video);
    let srcs: Vec<String> = sources.iter().filter_map(|s| app.surface().attribute(*s, "src")).collect();
    assert_eq!(srcs, ["v/zoomies-1080.mp4", "v/zoomies-720.mp4", "v/zoomies-480.mp4"]);
    assert!(!app.surface().is_observed(video, ObserverKind::LazyMedia));
}

#[test]
fn events_pushed_through_the_channel_are_pumped() {
    let mut app = app_with(&STAGES, r#"[{"type":"video","base":"v/zoomies"}]"#);
    let video = app.lazy_node(card_id(&app, 0)).unwrap();
    let tx = app.event_sender();

    tx.send(SurfaceEvent::Intersection {
        observer: ObserverKind::LazyMedia,
        entries:  vec![IntersectionEntry { node: video, is_intersecting: true }],
    })
    .unwrap();
    tx.send(SurfaceEvent::KeyDown { key: "Enter".into() }).unwrap();

    assert_eq!(app.pump(), 2);
    assert_eq!(app.surface().children(video).len(), 3);
    assert_eq!(app.pump(), 0);
}

#[test]
fn feed_failure_renders_only_the_apology() {
    let config = GalleryConfig::default();
    let mut dom = DomSurface::new();
    build_stage_page(&mut dom, &config, &["each_other".to_string()]);
    let mut app = GalleryApp::new(dom, config.clone());

    let result = app.mount_feed(parse_feed("{not json"));
    assert!(matches!(result, Err(FeedError::Json(_))));

    let gallery = app.surface().element_by_id("gallery").unwrap();
    let children = app.surface().children(gallery);
    assert_eq!(children.len(), 1);
    assert_eq!(app.surface().attribute(children[0], "class").as_deref(), Some("gallery-error"));
    assert_eq!(app.surface().text_content(children[0]), config.apology);
    assert!(app.surface().element_by_id("gallery-each_other").is_none());
    assert_eq!(app.diagnostics().count(DiagnosticKind::FeedUnavailable), 1);
}

#[test]
fn network_failure_is_also_terminal() {
    let mut app = GalleryApp::new(DomSurface::new(), GalleryConfig::default());
    let err = app.mount_feed(Err(FeedError::Fetch("connection refused".into()))).unwrap_err();
    assert!(err.to_string().contains("connection refused"));
    assert!(app.surface().to_html().contains("gallery-error"));
}

#[test]
fn stage_without_mount_point_falls_back_to_terminal() {
    let config = GalleryConfig::default();
    let mut dom = DomSurface::new();
    build_stage_page(&mut dom, &config, &["each_other".to_string(), "ready_for_launch".to_string()]);

    // A section declaring a stage but missing its grid.
    let orphan = dom.create_element("section");
    dom.set_attribute(orphan, "data-stage", "first_moves");
    let main = dom.element_by_id("gallery").unwrap();
    dom.append_child(main, orphan);

    let mut app = GalleryApp::new(dom, config);
    let report = app
        .mount_feed(parse_feed(r#"[{"type":"image","src":"a.jpg","stage":"first_moves"}]"#))
        .unwrap();

    assert_eq!((report.mounted, report.dropped), (1, 0));
    let counted = |key: &str| report.summary.per_stage.iter().find(|(k, _)| k == key).map(|(_, n)| *n);
    assert_eq!(counted("first_moves"), Some(0));
    assert_eq!(counted("ready_for_launch"), Some(1));
    let terminal = app.surface().element_by_id("gallery-ready_for_launch").unwrap();
    assert_eq!(app.surface().children(terminal).len(), 1);
    assert!(app.diagnostics().is_empty());
}

#[test]
fn no_terminal_mount_drops_with_diagnostic() {
    let config = GalleryConfig::default();
    let mut dom = DomSurface::new();
    build_stage_page(&mut dom, &config, &["each_other".to_string()]);
    let mut app = GalleryApp::new(dom, config);
    let report = app
        .mount_feed(parse_feed(
            r#"[
                {"type":"image","src":"a.jpg","stage":"each_other"},
                {"type":"image","src":"b.jpg","stage":"somewhere_else"}
            ]"#,
        ))
        .unwrap();

    assert_eq!((report.mounted, report.dropped), (1, 1));
    let per_stage: Vec<_> = report.summary.per_stage.iter().map(|(k, n)| (k.as_str(), *n)).collect();
    assert_eq!(per_stage, [("each_other", 1), ("ready_for_launch", 0)]);

    let drops: Vec<_> = app.diagnostics().iter().filter(|d| d.kind == DiagnosticKind::MountMissing).collect();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].item, Some(1));
    assert_eq!(app.cards_in_feed_order().len(), 1);

    let mount = app.surface().element_by_id("gallery-each_other").unwrap();
    assert_eq!(app.surface().children(mount).len(), 1);
}

#[test]
fn base_image_grid_and_lightbox_urls_differ() {
    let mut app = app_with(&STAGES, r#"[{"type":"image","base":"m/kit-04"},{"type":"image","src":"solo.jpg"}]"#);
    let (multi, single) = (card_id(&app, 0), card_id(&app, 1));

    let grid = app.surface().node_html(app.card_media_node(multi).unwrap());
    assert!(grid.contains(r#"src="m/kit-04-800.jpg""#));
    assert!(!grid.contains("2400"));
    let multi_root = app.card_node(multi).unwrap();
    click(&mut app, multi_root);
    assert!(lightbox_html(&app).contains(r#"src="m/kit-04-2400.jpg""#));

    let single_root = app.card_node(single).unwrap();
    click(&mut app, single_root);
    let grid = app.surface().node_html(app.card_media_node(single).unwrap());
    assert!(grid.contains(r#"src="solo.jpg""#));
    assert!(lightbox_html(&app).contains(r#"src="solo.jpg""#));
}

#[test]
fn embed_plays_inline_on_fine_pointers_and_opens_lightbox_on_coarse() {
    let feed = r#"[{"type":"youtube","videoId":"abc123","title":"Kit meets Mum"}]"#;

    let mut fine = app_with(&STAGES, feed);
    let id = card_id(&fine, 0);
    let media = fine.card_media_node(id).unwrap();
    assert!(!fine.surface().node_html(media).contains("iframe"));
    click(&mut fine, media);
    assert!(!fine.lightbox().is_open());
    assert!(fine.surface().node_html(media).contains("https://www.youtube.com/embed/abc123?autoplay=1"));

    let mut coarse = app_with(&STAGES, feed);
    coarse.surface_mut().set_pointer_class(PointerClass::Coarse);
    let id = card_id(&coarse, 0);
    let media = coarse.card_media_node(id).unwrap();
    click(&mut coarse, media);
    assert!(coarse.lightbox().is_open());
    assert!(!coarse.surface().node_html(media).contains("iframe"));
    assert!(lightbox_html(&coarse).contains("aspect-ratio:16/9"));
}

#[test]
fn popup_opens_lightbox_regardless_of_pointer() {
    let mut app = app_with(&STAGES, r#"[{"type":"youtube","src":"https://www.youtube.com/watch?v=abc123"}]"#);
    let id = card_id(&app, 0);
    let popup = popup_button(&app, id);
    click(&mut app, popup);
    assert_eq!(app.lightbox().state().open_card(), Some(id));
    assert!(!app.surface().node_html(app.card_media_node(id).unwrap()).contains("iframe"));
}

#[test]
fn analysis_details_reach_the_lightbox_text_block() {
    let mut app = app_with(
        &STAGES,
        r#"[
            {"type":"video","src":"v/kit-09.mp4","asset_key":"kit-09","story":"First hunt.",
             "details":["Crouches behind the sofa","Pounces on the ribbon"]},
            {"type":"video","src":"v/kit-10.mp4","story":"Nap time."}
        ]"#,
    );
    let (with, without) = (card_id(&app, 0), card_id(&app, 1));
    let root = app.card_node(with).unwrap();
    assert_eq!(app.surface().attribute(root, "data-asset").as_deref(), Some("kit-09"));

    let popup = popup_button(&app, with);
    click(&mut app, popup);
    assert!(lightbox_html(&app)
        .contains("<ul class=\"lightbox__details\"><li>Crouches behind the sofa</li><li>Pounces on the ribbon</li></ul>"));

    let popup = popup_button(&app, without);
    click(&mut app, popup);
    let html = lightbox_html(&app);
    assert!(html.contains("<p>Nap time.</p>"));
    assert!(!html.contains("lightbox__details"));
    assert_eq!(app.surface().attribute(app.card_node(without).unwrap(), "data-asset"), None);
}
