//! Upstream declarative timeline state, read-only input to this engine.

pub(crate) mod model;
