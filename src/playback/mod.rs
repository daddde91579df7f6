//! Playback-gated variable pushes into the scene runtime.

pub(crate) mod gate;
