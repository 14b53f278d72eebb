//! Per-frame driver: clock, schedule, slot renders and the composite draw.

pub(crate) mod command;
#[allow(clippy::module_inception)]
pub(crate) mod compositor;
