use std::collections::BTreeMap;

use crate::compile::cache::ModuleCache;
use crate::compile::compiler::SceneCompiler;
use crate::foundation::core::{Canvas, Point, Rect, Vec2, ViewportTransform};
use crate::foundation::error::StageResult;
use crate::hit::tester::{self, HitTestContext};
use crate::playback::gate::{GateEffect, PlaybackGate, Snapshot};
use crate::scene::runtime::{CompileService, ModuleLoader, PlayerOpts, ScenePlayer};
use crate::selection::reconciler::{ClipUpdate, InteractionMode, SelectionReconciler};
use crate::timeline::model::Clip;
use crate::viewport::controller::ViewportController;
use crate::viewport::gesture::{TouchGestures, TouchPoint, TouchRelease};

/// One preview session bound to one open project.
///
/// Owns the five synchronization components and the shared mutable context
/// they read (latest snapshot, selection, playhead), and routes events
/// between them: declarative-state changes through the playback gate, clicks
/// through suppression and hit-testing, per-frame ticks into momentum and the
/// selection grace timer.
pub struct PreviewSession {
    compiler: SceneCompiler,
    gate: PlaybackGate,
    viewport: ViewportController,
    gestures: TouchGestures,
    reconciler: SelectionReconciler,
    player: Option<Box<dyn ScenePlayer>>,
    player_generation: u64,
    fps: f64,
    resolution_scale: f64,
    selection: Option<String>,
    suppress_next_click: bool,
    latest_snapshot: Snapshot,
}

impl PreviewSession {
    /// Create a session for a project.
    pub fn new(
        project_id: impl Into<String>,
        loader: Box<dyn ModuleLoader>,
        cache: Box<dyn ModuleCache>,
        canvas: Canvas,
        container: Vec2,
        resolution_scale: f64,
    ) -> Self {
        Self {
            compiler: SceneCompiler::new(project_id, loader, cache),
            gate: PlaybackGate::new(),
            viewport: ViewportController::new(canvas, container),
            gestures: TouchGestures::new(),
            reconciler: SelectionReconciler::new(),
            player: None,
            player_generation: 0,
            fps: 30.0,
            resolution_scale,
            selection: None,
            suppress_next_click: false,
            latest_snapshot: Snapshot::default(),
        }
    }

    /// Recompile the scene from an override set and, if a new module was
    /// installed, replace the player and push the latest snapshot into it.
    pub fn recompile(
        &mut self,
        service: &dyn CompileService,
        overrides: BTreeMap<String, String>,
    ) -> StageResult<()> {
        self.compiler.compile_now(service, overrides);
        self.refresh_player()
    }

    /// Upstream declarative state changed.
    ///
    /// Records the snapshot as the session's latest and routes it through the
    /// playback gate.
    pub fn state_changed(&mut self, snapshot: Snapshot) -> StageResult<GateEffect> {
        self.latest_snapshot = snapshot.clone();
        match self.player.as_mut() {
            Some(player) => self.gate.apply(snapshot, player.as_mut()),
            None => Ok(GateEffect::Unchanged),
        }
    }

    /// Playback stopped; flush any snapshot buffered during the play session.
    pub fn playback_stopped(&mut self) -> StageResult<bool> {
        match self.player.as_mut() {
            Some(player) => self.gate.playback_stopped(player.as_mut()),
            None => Ok(false),
        }
    }

    /// Process a selection click at a screen position.
    ///
    /// A click immediately following a drag release is suppressed, so
    /// dropping a clip on top of another element does not also select it.
    /// Empty space clears the selection.
    pub fn click(&mut self, screen: Point) -> Option<&str> {
        if self.suppress_next_click {
            self.suppress_next_click = false;
            return self.selection.as_deref();
        }

        let hit = self.player.as_ref().and_then(|player| {
            let tree = player.render_tree()?;
            let ctx = HitTestContext {
                layers: &self.latest_snapshot.layers,
                playhead_s: player.playback().frame as f64 / self.fps,
                transform: self.viewport.transform(),
                container: self.viewport.container(),
                canvas: self.viewport.canvas(),
                resolution_scale: self.resolution_scale,
                tree,
            };
            tester::resolve(screen, &ctx)
        });

        if hit.is_none() {
            self.reconciler.clear();
        }
        self.selection = hit;
        self.selection.as_deref()
    }

    /// Handle touch-start on the preview surface.
    pub fn touch_start(&mut self, touches: &[TouchPoint], now_ms: f64) {
        self.gestures.touch_start(touches, now_ms, &mut self.viewport);
    }

    /// Handle touch-move on the preview surface.
    pub fn touch_move(&mut self, touches: &[TouchPoint], now_ms: f64) {
        self.gestures.touch_move(touches, now_ms, &mut self.viewport);
    }

    /// Handle touch-end; taps are forwarded to hit-testing.
    pub fn touch_end(&mut self, remaining: &[TouchPoint], now_ms: f64) -> TouchRelease {
        let release = self.gestures.touch_end(remaining, now_ms, &mut self.viewport);
        if let TouchRelease::Tap(pos) = release {
            self.click(pos);
        }
        release
    }

    /// Begin a drag or resize on the selected clip.
    pub fn begin_interaction(&mut self, mode: InteractionMode, pointer: Point) -> StageResult<()> {
        let (clip_id, position, scale) = {
            let clip = self.selected_clip().ok_or_else(|| {
                crate::foundation::error::StageError::node_resolution("no clip selected")
            })?;
            (clip.id.clone(), clip.position, clip.scale)
        };
        self.reconciler
            .begin_interaction(mode, clip_id, pointer, position, scale)
    }

    /// Continue an interaction; the returned update is written into the
    /// editor's clip data by the host.
    pub fn interaction_move(&mut self, pointer: Point) -> Option<ClipUpdate> {
        let zoom = self.viewport.transform().zoom;
        self.reconciler.pointer_move(pointer, zoom)
    }

    /// End an interaction; arms the grace window and click suppression.
    pub fn end_interaction(&mut self, now_ms: f64) {
        if self.reconciler.end_interaction(now_ms) {
            self.suppress_next_click = true;
        }
    }

    /// Per-frame tick: momentum, the selection grace timer, and the
    /// authoritative selection rect.
    pub fn tick(&mut self, now_ms: f64) {
        self.viewport.tick();
        self.reconciler.tick(now_ms);
        self.sync_selection_rect();
    }

    /// Pan/zoom controller, for wheel and pointer routing.
    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    /// Current viewport transform.
    pub fn transform(&self) -> ViewportTransform {
        self.viewport.transform()
    }

    /// Currently selected clip id.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Selection rectangle to render, in screen pixels.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.reconciler.displayed()
    }

    /// Compile/load error to show in the UI banner, if any.
    pub fn compile_error(&self) -> Option<&str> {
        self.compiler.last_error()
    }

    /// Dismiss the compile error banner.
    pub fn dismiss_compile_error(&mut self) {
        self.compiler.clear_error();
    }

    /// The live player, if a scene has been compiled.
    pub fn player(&self) -> Option<&dyn ScenePlayer> {
        self.player.as_deref()
    }

    fn selected_clip(&self) -> Option<&Clip> {
        let id = self.selection.as_deref()?;
        self.latest_snapshot
            .layers
            .iter()
            .flat_map(|l| l.clips.iter())
            .find(|c| c.id == id)
    }

    /// Swap in a fresh player when the compiler installed a new module.
    fn refresh_player(&mut self) -> StageResult<()> {
        let generation = self.compiler.generation();
        if generation == self.player_generation {
            return Ok(());
        }
        let Some(scene) = self.compiler.scene() else {
            return Ok(());
        };

        let descriptor = scene.module.descriptor();
        self.fps = descriptor.fps;
        let opts = PlayerOpts {
            canvas: descriptor.canvas,
            frame_range: (0, duration_frames(self.latest_snapshot.duration_s, descriptor.fps)),
            fps: descriptor.fps,
            resolution_scale: self.resolution_scale,
        };
        let mut player = scene.module.create_player(&opts)?;
        self.viewport.set_canvas(descriptor.canvas);

        // A new player starts empty: reset the gate and push the latest
        // snapshot unconditionally.
        self.player_generation = generation;
        self.gate.player_changed(generation);
        self.gate
            .apply(self.latest_snapshot.clone(), player.as_mut())?;
        self.player = Some(player);
        Ok(())
    }

    fn sync_selection_rect(&mut self) {
        let Some(clip) = self.selected_clip() else {
            return;
        };
        let Some(key) = self
            .latest_snapshot
            .layers
            .iter()
            .find(|l| l.clips.iter().any(|c| c.id == clip.id))
            .and_then(|l| clip.node_key(l.kind))
        else {
            return;
        };
        let Some(tree) = self.player.as_ref().and_then(|p| p.render_tree()) else {
            return;
        };
        let Some(node) = tree.node(&key) else {
            return;
        };
        if let Err(e) = self.reconciler.sync_scene_rect(
            node,
            self.resolution_scale,
            self.viewport.transform(),
            self.viewport.canvas(),
            self.viewport.container(),
        ) {
            // Keep the previous rect on a bad frame.
            tracing::debug!(error = %e, "authoritative rect update suppressed");
        }
    }
}

fn duration_frames(duration_s: f64, fps: f64) -> u64 {
    (duration_s * fps).floor().max(0.0) as u64
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("compiler", &self.compiler)
            .field("selection", &self.selection)
            .field("suppress_next_click", &self.suppress_next_click)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
