use crate::foundation::error::{StageError, StageResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Target render resolution of the scene canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in render pixels.
    pub width: u32,
    /// Height in render pixels.
    pub height: u32,
}

/// Zoom floor shared by wheel and pinch gestures.
pub const MIN_ZOOM: f64 = 0.1;
/// Zoom ceiling shared by wheel and pinch gestures.
pub const MAX_ZOOM: f64 = 10.0;

/// Margin applied when fitting the canvas into its container.
const FIT_MARGIN: f64 = 0.9;

/// Viewport transform applied to the preview surface.
///
/// `zoom` is a scale factor; `x`/`y` are pixel offsets of the scene center
/// relative to the container center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportTransform {
    /// Scale factor, always positive.
    pub zoom: f64,
    /// Horizontal offset of the scene center from the container center.
    pub x: f64,
    /// Vertical offset of the scene center from the container center.
    pub y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ViewportTransform {
    /// Derive the fit-to-container transform for a canvas inside a container.
    ///
    /// Recomputed from current sizes on every use so a resized container never
    /// drifts out of sync with a stored value.
    pub fn fit(canvas: Canvas, container: Vec2) -> StageResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(StageError::geometry("canvas must be non-empty"));
        }
        if container.x <= 0.0 || container.y <= 0.0 {
            return Err(StageError::geometry("container must be non-empty"));
        }
        let zoom = (container.x / f64::from(canvas.width))
            .min(container.y / f64::from(canvas.height))
            * FIT_MARGIN;
        Ok(Self {
            zoom,
            x: 0.0,
            y: 0.0,
        })
    }

    /// Map a CSS-space point (container coordinates, untransformed surface)
    /// to the on-screen point after zoom and pan about the container center.
    pub fn css_to_screen(self, css: Point, container: Vec2) -> Point {
        let cx = container.x / 2.0;
        let cy = container.y / 2.0;
        Point::new(
            (css.x - cx) * self.zoom + cx + self.x,
            (css.y - cy) * self.zoom + cy + self.y,
        )
    }

    /// Inverse of [`Self::css_to_screen`]: recover the CSS-space point under a
    /// screen pixel.
    pub fn screen_to_css(self, screen: Point, container: Vec2) -> Point {
        let cx = container.x / 2.0;
        let cy = container.y / 2.0;
        Point::new(
            (screen.x - cx - self.x) / self.zoom + cx,
            (screen.y - cy - self.y) / self.zoom + cy,
        )
    }
}

/// Top-left corner of the stage surface within its container, at zoom 1.
///
/// The stage renders at the canvas resolution and sits centered in the
/// container; the viewport transform is applied on top of this placement.
pub fn stage_origin(canvas: Canvas, container: Vec2) -> Point {
    Point::new(
        (container.x - f64::from(canvas.width)) / 2.0,
        (container.y - f64::from(canvas.height)) / 2.0,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
