//! stagesync keeps a video-editor's canvas preview synchronized with a live,
//! hot-recompiled scene program, user gestures, and direct manipulation of
//! on-canvas elements, all while continuous playback is running.
//!
//! # Components
//!
//! Five cooperating pieces, one set per open editor session:
//!
//! 1. **Compile**: [`SceneCompiler`] turns named source overrides into the
//!    session's scene module, cached by content hash, with single-flight
//!    coalescing of change bursts.
//! 2. **Gate**: [`PlaybackGate`] buffers variable pushes while playback runs
//!    so authoring edits never stutter the preview mid-play.
//! 3. **Viewport**: [`ViewportController`] owns the pan/zoom transform under
//!    wheel, drag, and multi-touch input, including pinch and momentum.
//! 4. **Hit-testing**: [`hit_test`] projects a screen click into scene-local
//!    space and resolves the topmost active clip.
//! 5. **Selection**: [`SelectionReconciler`] blends an authoritative
//!    scene-derived selection rect with an optimistic pointer-derived one
//!    during interactive edits.
//!
//! [`PreviewSession`] wires them together and routes events between them.
//!
//! The engine is single-threaded and cooperative: there are no locks and no
//! async runtime. The compile service round-trip, the only true suspension
//! point, is reified as a [`CompileTicket`] handshake the host drives; per
//! frame animations (momentum, the selection grace window) advance through
//! explicit `tick` calls with host-supplied timestamps. The scene runtime
//! itself is a black-box collaborator behind the traits in [`scene`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compile;
mod foundation;
mod hit;
mod playback;
mod selection;
mod session;
mod timeline;
mod viewport;

/// Seams to the black-box scene runtime (compile service, module loader,
/// player, render tree).
pub mod scene;

pub use compile::cache::{CacheEntry, DiskCache, MemoryCache, ModuleCache};
pub use compile::compiler::{CompileTicket, LoadedScene, SceneCompiler, TicketPurpose};
pub use compile::fingerprint::{ContentHash, fingerprint_overrides};
pub use compile::single_flight::SingleFlight;
pub use foundation::core::{
    Canvas, MAX_ZOOM, MIN_ZOOM, Point, Rect, Vec2, ViewportTransform, stage_origin,
};
pub use foundation::error::{StageError, StageResult};
pub use hit::tester::{HitTestContext, resolve as hit_test};
pub use playback::gate::{GateEffect, PlaybackGate, Snapshot};
pub use selection::reconciler::{
    ClipUpdate, Handle, InteractionMode, SelectionReconciler,
};
pub use session::preview::PreviewSession;
pub use timeline::model::{
    CaptionSettings, Clip, Layer, LayerKind, TextClipSettings, Transcription, TranscriptionMap,
    TransitionMap, TransitionSpec,
};
pub use viewport::controller::{PointerButton, ViewportController, WheelEvent};
pub use viewport::gesture::{TouchGestures, TouchPoint, TouchRelease};
pub use viewport::momentum::Momentum;
