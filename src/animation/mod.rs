//! Procedural animation: accent curves, occupant opacity and the object window scheduler.

pub(crate) mod curve;
pub(crate) mod occupant;
pub(crate) mod opacity;
