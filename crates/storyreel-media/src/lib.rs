// crates/storyreel-media/src/lib.rs
//
// No surface dependency. Hands attachments to storyreel-ui via a channel only.
//
// To add a new deferred resource:
//   1. Decide its `SourcePlan` in sources.rs
//   2. Register it with `LazyScheduler::register`
//   3. Drain `LazyScheduler::rx` where the surface is reachable (app.rs)

pub mod scheduler;
pub mod sources;

// Re-export the main public API so storyreel-ui imports are simple.
pub use scheduler::{Attachment, LazyScheduler};
pub use sources::{plan_sources, SourcePlan};
pub use storyreel_core::helpers::renditions::VideoSource;
