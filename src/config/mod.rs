//! JSON-facing configuration: tunable compositor scalars and stage documents.

pub(crate) mod color;
pub(crate) mod params;
pub(crate) mod stage;
