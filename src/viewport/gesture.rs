use crate::foundation::core::{MAX_ZOOM, MIN_ZOOM, Point, Vec2};
use crate::viewport::controller::ViewportController;

/// Cumulative movement below this at release is a tap, not a pan.
const TAP_THRESHOLD_PX: f64 = 5.0;
/// Velocity samples are normalized to a ~60fps frame: `delta / elapsed * 16`.
const FRAME_MS: f64 = 16.0;

/// One active touch point in container coordinates.
#[derive(Clone, Copy, Debug)]
pub struct TouchPoint {
    /// Stable identifier for the duration of the touch.
    pub id: u64,
    /// Position relative to the container's top-left corner.
    pub pos: Point,
}

/// Outcome of a touch release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchRelease {
    /// Fingers remain on the surface; the gesture re-baselined.
    Continuing,
    /// Movement stayed under the tap threshold: forward as a selection click.
    Tap(Point),
    /// A pan ended with residual velocity; momentum is now running.
    Momentum,
    /// The gesture ended with nothing further to do.
    Ended,
}

/// Transient per-gesture baseline, created on touch-start and destroyed on
/// touch-end.
#[derive(Clone, Copy, Debug)]
struct GestureState {
    touch_count: usize,
    initial_distance: f64,
    initial_center: Point,
    initial_zoom: f64,
    initial_position: Vec2,
    last_touch_pos: Point,
    last_touch_time_ms: f64,
    velocity: Vec2,
    is_panning: bool,
    total_movement: f64,
}

/// Multi-touch input processor for the preview surface.
///
/// Translates raw touch events into pinch-zoom (about the live centroid),
/// single-finger pan with momentum, and tap-vs-pan disambiguation. All
/// viewport mutation goes through the [`ViewportController`] entry points.
#[derive(Debug, Default)]
pub struct TouchGestures {
    state: Option<GestureState>,
}

impl TouchGestures {
    /// Create an idle processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture is currently in progress.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Handle touch-start. Cancels any running momentum before anything else
    /// so two writers never compete for the viewport position.
    pub fn touch_start(
        &mut self,
        touches: &[TouchPoint],
        now_ms: f64,
        viewport: &mut ViewportController,
    ) {
        viewport.cancel_momentum();
        self.state = Self::baseline(touches, now_ms, viewport);
    }

    /// Handle touch-move.
    pub fn touch_move(
        &mut self,
        touches: &[TouchPoint],
        now_ms: f64,
        viewport: &mut ViewportController,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if state.touch_count >= 2 && touches.len() >= 2 {
            pinch_update(state, touches, viewport);
        } else if state.touch_count == 1 {
            if let Some(touch) = touches.first() {
                pan_update(state, touch.pos, now_ms, viewport);
            }
        }
    }

    /// Handle touch-end with the touches that remain on the surface.
    ///
    /// With fingers remaining the gesture re-baselines (pinch dropping to a
    /// single finger becomes a pan). On full release a short single-finger
    /// gesture is reported as a tap for hit-testing; a real pan hands its
    /// last velocity sample to the momentum animation.
    pub fn touch_end(
        &mut self,
        remaining: &[TouchPoint],
        now_ms: f64,
        viewport: &mut ViewportController,
    ) -> TouchRelease {
        let Some(state) = self.state.take() else {
            return TouchRelease::Ended;
        };

        if !remaining.is_empty() {
            self.state = Self::baseline(remaining, now_ms, viewport);
            return TouchRelease::Continuing;
        }

        if state.touch_count == 1 {
            if !state.is_panning && state.total_movement < TAP_THRESHOLD_PX {
                return TouchRelease::Tap(state.last_touch_pos);
            }
            viewport.start_momentum(state.velocity);
            return TouchRelease::Momentum;
        }

        TouchRelease::Ended
    }

    fn baseline(
        touches: &[TouchPoint],
        now_ms: f64,
        viewport: &mut ViewportController,
    ) -> Option<GestureState> {
        match touches {
            [] => None,
            [touch] => Some(GestureState {
                touch_count: 1,
                initial_distance: 0.0,
                initial_center: touch.pos,
                initial_zoom: viewport.transform().zoom,
                initial_position: position_of(viewport),
                last_touch_pos: touch.pos,
                last_touch_time_ms: now_ms,
                velocity: Vec2::ZERO,
                is_panning: false,
                total_movement: 0.0,
            }),
            [a, b, ..] => {
                // Pinch reads the explicit transform as its baseline, so fit
                // mode ends at gesture start rather than mid-move.
                viewport.leave_fit_mode();
                let t = viewport.transform();
                Some(GestureState {
                    touch_count: touches.len(),
                    initial_distance: a.pos.distance(b.pos),
                    initial_center: midpoint(a.pos, b.pos),
                    initial_zoom: t.zoom,
                    initial_position: Vec2::new(t.x, t.y),
                    last_touch_pos: midpoint(a.pos, b.pos),
                    last_touch_time_ms: now_ms,
                    velocity: Vec2::ZERO,
                    is_panning: false,
                    total_movement: 0.0,
                })
            }
        }
    }
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn position_of(viewport: &ViewportController) -> Vec2 {
    let t = viewport.transform();
    Vec2::new(t.x, t.y)
}

fn pinch_update(state: &mut GestureState, touches: &[TouchPoint], viewport: &mut ViewportController) {
    if state.initial_distance <= 0.0 {
        return;
    }
    let (a, b) = (touches[0].pos, touches[1].pos);
    let scale = a.distance(b) / state.initial_distance;
    let new_zoom = (state.initial_zoom * scale).clamp(MIN_ZOOM, MAX_ZOOM);

    // The centroid itself moves across the gesture, so zooming about a fixed
    // origin is not enough: recompute the position so the scene point that
    // was under the initial centroid stays under the *current* centroid.
    let center = viewport.container() / 2.0;
    let centroid = midpoint(a, b);
    let scene_x = (state.initial_center.x - center.x - state.initial_position.x) / state.initial_zoom;
    let scene_y = (state.initial_center.y - center.y - state.initial_position.y) / state.initial_zoom;
    let x = centroid.x - center.x - scene_x * new_zoom;
    let y = centroid.y - center.y - scene_y * new_zoom;
    viewport.set_zoom_and_position(new_zoom, x, y);
}

fn pan_update(
    state: &mut GestureState,
    pos: Point,
    now_ms: f64,
    viewport: &mut ViewportController,
) {
    let delta = pos - state.last_touch_pos;
    if delta.x == 0.0 && delta.y == 0.0 {
        return;
    }

    viewport.leave_fit_mode();
    viewport.pan_by(delta);

    state.total_movement += delta.hypot();
    if state.total_movement >= TAP_THRESHOLD_PX {
        state.is_panning = true;
    }

    // Instantaneous velocity, not a moving average: the most recent sample
    // wins, normalized to a ~60fps frame.
    let elapsed = now_ms - state.last_touch_time_ms;
    if elapsed > 0.0 {
        state.velocity = delta * (FRAME_MS / elapsed);
    }

    state.last_touch_pos = pos;
    state.last_touch_time_ms = now_ms;
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/gesture.rs"]
mod tests;
