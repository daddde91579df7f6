//! Per-editor-session wiring of the synchronization components.

pub(crate) mod preview;
