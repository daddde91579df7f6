//! Seams to the black-box scene runtime.
//!
//! The animation engine that actually renders a compiled scene is an external
//! collaborator. stagesync only drives it, so its whole surface is captured
//! here as object-safe traits: a compile service that turns source overrides
//! into module text, a loader that instantiates module text in isolation, and
//! the player/render-tree handles the compiled module exposes.

use std::collections::BTreeMap;

use crate::foundation::core::{Affine, Canvas, Rect, Vec2};
use crate::foundation::error::StageResult;
use crate::playback::gate::Snapshot;

/// External compile service: override set in, module text out.
///
/// Errors carry a human-readable message used verbatim in the UI and for
/// compile-error line/file extraction.
pub trait CompileService {
    /// Compile the named source overrides into executable module text.
    fn compile(&self, overrides: &BTreeMap<String, String>) -> StageResult<String>;
}

/// Executes module text as an isolated module.
///
/// Implementations must not leak state between loads; each call yields a
/// fresh scene descriptor.
pub trait ModuleLoader {
    /// Instantiate module text, yielding a scene module on success.
    fn load(&self, module_text: &str) -> StageResult<Box<dyn SceneModule>>;
}

/// A successfully instantiated scene module.
pub trait SceneModule {
    /// Scene metadata: preview defaults and default canvas size.
    fn descriptor(&self) -> SceneDescriptor;

    /// Construct a player for this module.
    fn create_player(&self, opts: &PlayerOpts) -> StageResult<Box<dyn ScenePlayer>>;
}

/// Scene metadata exposed by a compiled module.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescriptor {
    /// Default canvas size declared by the scene program.
    pub canvas: Canvas,
    /// Frames per second the scene was authored at.
    pub fps: f64,
}

/// Construction options for a scene player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerOpts {
    /// Canvas size to render at.
    pub canvas: Canvas,
    /// Inclusive frame range to expose for playback.
    pub frame_range: (u64, u64),
    /// Frames per second.
    pub fps: f64,
    /// Render resolution scale relative to CSS pixels.
    pub resolution_scale: f64,
}

/// Playback state reported by a scene player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackInfo {
    /// Whether playback is currently running.
    pub playing: bool,
    /// Current frame index.
    pub frame: u64,
    /// Playback speed multiplier.
    pub speed: f64,
    /// Whether looping is enabled.
    pub loop_enabled: bool,
    /// Whether audio is muted.
    pub muted: bool,
}

/// Live scene player driving the preview surface.
pub trait ScenePlayer {
    /// Push a full variable snapshot into the running scene.
    ///
    /// Triggers a synchronous timing-graph recomputation inside the runtime,
    /// which is why pushes are gated during playback.
    fn set_variables(&mut self, snapshot: &Snapshot) -> StageResult<()>;

    /// Ask the runtime to recompute its timing graphs.
    fn request_recalculation(&mut self);

    /// Seek playback to a frame.
    fn request_seek(&mut self, frame: u64);

    /// Ask the runtime to redraw the current frame.
    fn request_render(&mut self);

    /// Current playback state, observed at call time.
    fn playback(&self) -> PlaybackInfo;

    /// Render tree of the current frame, if one has been drawn.
    fn render_tree(&self) -> Option<&dyn RenderTree>;
}

/// Node lookup over the player's current render tree.
pub trait RenderTree {
    /// Look up a node by its resolved key.
    fn node(&self, key: &str) -> Option<&dyn SceneNode>;
}

/// One node in the live render tree.
pub trait SceneNode {
    /// Local-to-world transform of this node.
    ///
    /// Fails with [`crate::StageError::Geometry`] when the runtime cannot
    /// produce a matrix for the node this frame.
    fn world_transform(&self) -> StageResult<Affine>;

    /// Explicit width/height declared on the node, in scene units.
    ///
    /// Container-style nodes commonly report zero here.
    fn size(&self) -> Vec2;

    /// Cached content bounding box in node-local space, if any.
    ///
    /// Fallback used for containment tests when [`Self::size`] is zero.
    fn content_bounds(&self) -> Option<Rect>;
}

#[cfg(test)]
#[path = "../../tests/unit/scene/runtime.rs"]
mod tests;
