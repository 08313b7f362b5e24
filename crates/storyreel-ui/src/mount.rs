// crates/storyreel-ui/src/mount.rs
// Built-in host page: one section wrapper + mount point per declared stage.
//
//   <nav id="{nav_strip_id}"></nav>
//   <main id="{gallery_root_id}">
//     <section class="stage-section" data-stage="{key}">
//       <h2>{label}</h2>
//       <div id="{mount_prefix}{key}" class="gallery-grid"></div>
//     </section>
//     …
//   </main>
//
// Real hosts declare this markup themselves; the binary and the tests use
// this one.

use storyreel_core::GalleryConfig;

use crate::helpers::format::humanize_key;
use crate::surface::Surface;
use crate::theme;

/// Write the skeleton under the surface root. Labels are humanized keys.
pub fn build_stage_page<S: Surface>(surface: &mut S, config: &GalleryConfig, stage_keys: &[String]) {
    let root = surface.root();

    let nav = surface.create_element("nav");
    surface.set_attribute(nav, "id", &config.nav_strip_id);
    surface.set_attribute(nav, "class", theme::NAV_STRIP);
    surface.append_child(root, nav);

    let main = surface.create_element("main");
    surface.set_attribute(main, "id", &config.gallery_root_id);
    surface.append_child(root, main);

    for key in stage_keys {
        let section = surface.create_element("section");
        surface.set_attribute(section, "class", theme::STAGE_SECTION);
        surface.set_attribute(section, "data-stage", key);

        let heading = surface.create_element("h2");
        surface.set_text(heading, &humanize_key(key));
        surface.append_child(section, heading);

        let grid = surface.create_element("div");
        surface.set_attribute(grid, "id", &config.mount_id(key));
        surface.set_attribute(grid, "class", theme::GRID);
        surface.append_child(section, grid);

        surface.append_child(main, section);
    }

    tracing::debug!(stages = stage_keys.len(), "built stage page");
}
