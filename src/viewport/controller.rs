use crate::foundation::core::{Canvas, MAX_ZOOM, MIN_ZOOM, Point, Vec2, ViewportTransform};
use crate::viewport::momentum::Momentum;

/// Wheel step applied per event: `zoom × (1 − sign(deltaY) · 0.1)`.
const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Mouse button identifiers for drag-to-pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Middle button / wheel click.
    Middle,
    /// Secondary button.
    Right,
}

/// A wheel event in container coordinates.
#[derive(Clone, Copy, Debug)]
pub struct WheelEvent {
    /// Horizontal scroll delta in pixels.
    pub delta_x: f64,
    /// Vertical scroll delta in pixels.
    pub delta_y: f64,
    /// Pointer position relative to the container's top-left corner.
    pub pointer: Point,
    /// Whether the zoom modifier (ctrl/cmd) is held.
    pub zoom_modifier: bool,
}

/// Owns the preview pan/zoom transform and serializes all writers to it.
///
/// Wheel, mouse-drag, touch gestures, and momentum all mutate position and
/// zoom exclusively through this type, so a wheel event arriving mid-pinch
/// cannot corrupt a gesture baseline.
#[derive(Debug)]
pub struct ViewportController {
    transform: ViewportTransform,
    zoom_to_fit: bool,
    container: Vec2,
    canvas: Canvas,
    drag_last: Option<Point>,
    momentum: Option<Momentum>,
}

impl ViewportController {
    /// Create a controller in zoom-to-fit mode.
    pub fn new(canvas: Canvas, container: Vec2) -> Self {
        Self {
            transform: ViewportTransform::default(),
            zoom_to_fit: true,
            container,
            canvas,
            drag_last: None,
            momentum: None,
        }
    }

    /// Current transform.
    ///
    /// In fit mode this is derived from the live container and canvas sizes
    /// on every call, so a resized container can never show a stale fit.
    pub fn transform(&self) -> ViewportTransform {
        if self.zoom_to_fit {
            ViewportTransform::fit(self.canvas, self.container).unwrap_or(self.transform)
        } else {
            self.transform
        }
    }

    /// Whether the viewport is in zoom-to-fit mode.
    pub fn zoom_to_fit(&self) -> bool {
        self.zoom_to_fit
    }

    /// Container size in CSS pixels.
    pub fn container(&self) -> Vec2 {
        self.container
    }

    /// Target canvas resolution.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Update the container size (e.g. after a panel resize).
    pub fn set_container(&mut self, container: Vec2) {
        self.container = container;
    }

    /// Update the target canvas resolution.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Reset to zoom-to-fit and drop any gesture or momentum in progress.
    pub fn recenter(&mut self) {
        self.zoom_to_fit = true;
        self.drag_last = None;
        self.momentum = None;
    }

    /// Process a wheel event: zoom about the pointer with the modifier held,
    /// otherwise pan by the scroll deltas.
    pub fn wheel(&mut self, ev: WheelEvent) {
        self.momentum = None;
        if ev.zoom_modifier {
            self.wheel_zoom(ev);
        } else {
            self.leave_fit_mode();
            self.transform.x -= ev.delta_x;
            self.transform.y -= ev.delta_y;
        }
    }

    /// Begin a drag-to-pan if the button/modifier combination calls for one.
    ///
    /// Active on middle button, or left button with shift held. Returns
    /// whether a pan started (the caller then routes moves here instead of
    /// treating them as element interaction).
    pub fn pointer_down(&mut self, pos: Point, button: PointerButton, shift: bool) -> bool {
        self.momentum = None;
        let pan = button == PointerButton::Middle || (button == PointerButton::Left && shift);
        if pan {
            self.leave_fit_mode();
            self.drag_last = Some(pos);
        }
        pan
    }

    /// Continue an active drag-to-pan.
    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(last) = self.drag_last {
            self.transform.x += pos.x - last.x;
            self.transform.y += pos.y - last.y;
            self.drag_last = Some(pos);
        }
    }

    /// End an active drag-to-pan.
    pub fn pointer_up(&mut self) {
        self.drag_last = None;
    }

    /// Advance the momentum animation by one frame.
    ///
    /// Returns `true` while the animation is still moving the viewport; once
    /// it terminates it is dropped and can only be restarted by a new
    /// gesture.
    pub fn tick(&mut self) -> bool {
        if let Some(momentum) = self.momentum.as_mut() {
            match momentum.step() {
                Some(delta) => {
                    self.transform.x += delta.x;
                    self.transform.y += delta.y;
                    return true;
                }
                None => self.momentum = None,
            }
        }
        false
    }

    /// Whether a momentum animation is currently running.
    pub fn has_momentum(&self) -> bool {
        self.momentum.is_some()
    }

    pub(crate) fn start_momentum(&mut self, velocity: Vec2) {
        self.momentum = Some(Momentum::new(velocity));
    }

    pub(crate) fn cancel_momentum(&mut self) {
        self.momentum = None;
    }

    pub(crate) fn pan_by(&mut self, delta: Vec2) {
        self.transform.x += delta.x;
        self.transform.y += delta.y;
    }

    pub(crate) fn set_zoom_and_position(&mut self, zoom: f64, x: f64, y: f64) {
        self.transform = ViewportTransform { zoom, x, y };
    }

    /// Leave fit mode, snapshotting the fit-derived transform as the new
    /// explicit baseline so the first manual gesture causes no visual jump.
    pub(crate) fn leave_fit_mode(&mut self) {
        if self.zoom_to_fit {
            self.transform = self.transform();
            self.zoom_to_fit = false;
        }
    }

    fn wheel_zoom(&mut self, ev: WheelEvent) {
        if ev.delta_y == 0.0 {
            return;
        }
        self.leave_fit_mode();
        let old_zoom = self.transform.zoom;
        let new_zoom =
            (old_zoom * (1.0 - ev.delta_y.signum() * WHEEL_ZOOM_STEP)).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / old_zoom;

        // Keep the scene point under the cursor fixed: with the pointer
        // expressed relative to the container center,
        // newPos = pointer + (oldPos - pointer) * ratio.
        let px = ev.pointer.x - self.container.x / 2.0;
        let py = ev.pointer.y - self.container.y / 2.0;
        self.transform = ViewportTransform {
            zoom: new_zoom,
            x: px + (self.transform.x - px) * ratio,
            y: py + (self.transform.y - py) * ratio,
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/controller.rs"]
mod tests;
