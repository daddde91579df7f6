//! Pan/zoom transform ownership and gesture input processing.

pub(crate) mod controller;
pub(crate) mod gesture;
pub(crate) mod momentum;
