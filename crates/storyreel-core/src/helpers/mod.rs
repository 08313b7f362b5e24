// crates/storyreel-core/src/helpers/mod.rs
//
// Small pure helpers shared by the classifier, the stage grouper and the
// state machines. Nothing in here knows about cards or surfaces.

pub mod geometry;
pub mod renditions;
pub mod youtube;
