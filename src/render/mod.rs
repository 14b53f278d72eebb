//! Rendering backends: the draw-call interface, an in-memory recorder and the CPU reference.

pub(crate) mod backend;
pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod recording;
