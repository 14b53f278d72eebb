//! Scene slots and the scene-graph interface they pose.

pub(crate) mod graph;
pub(crate) mod slot;
