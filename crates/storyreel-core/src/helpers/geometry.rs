// crates/storyreel-core/src/helpers/geometry.rs
//
// Viewport geometry shared by the nav tracker and the lightbox builders.
//
// Kept here rather than in storyreel-ui so the active-section selection can be
// tested as plain arithmetic without mounting a single node.

/// Width-to-height ratio used for embedded players (16:9).
pub const EMBED_ASPECT: f32 = 16.0 / 9.0;

/// Index of the section whose top edge is closest to the viewport top.
///
/// `tops` yields `(index, top)` pairs where `top` is the section's top edge
/// relative to the viewport top (negative = scrolled above). Ties go to the
/// earlier index so the result is stable across identical layouts.
///
/// ```
/// use storyreel_core::helpers::geometry::closest_to_top;
/// assert_eq!(closest_to_top([(0, -640.0), (1, 24.0), (2, 710.0)]), Some(1));
/// assert_eq!(closest_to_top(std::iter::empty()), None);
/// ```
pub fn closest_to_top<I>(tops: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, f32)>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, top) in tops {
        let dist = top.abs();
        match best {
            Some((_, d)) if d <= dist => {}
            _ => best = Some((index, dist)),
        }
    }
    best.map(|(index, _)| index)
}

/// CSS width expression that fits a box of `aspect` inside
/// `max_vw` × `max_vh` of the viewport, whichever bound bites first.
///
/// ```
/// use storyreel_core::helpers::geometry::bounded_width_css;
/// assert_eq!(bounded_width_css(2.0, 90.0, 80.0), "min(90vw, 160vh)");
/// ```
pub fn bounded_width_css(aspect: f32, max_vw: f32, max_vh: f32) -> String {
    let by_height = (max_vh * aspect * 100.0).round() / 100.0;
    format!("min({max_vw}vw, {by_height}vh)")
}
