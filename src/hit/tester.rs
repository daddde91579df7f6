use crate::foundation::core::{Canvas, Point, Vec2, ViewportTransform};
use crate::foundation::error::{StageError, StageResult};
use crate::scene::runtime::RenderTree;
use crate::timeline::model::{Clip, Layer, LayerKind};

/// Determinant floor below which a world matrix is treated as singular.
const DET_EPSILON: f64 = 1e-12;

/// Everything a hit test needs about the current editor state.
pub struct HitTestContext<'a> {
    /// Timeline layers, bottom-to-top.
    pub layers: &'a [Layer],
    /// Current playhead time in seconds.
    pub playhead_s: f64,
    /// Active viewport transform.
    pub transform: ViewportTransform,
    /// Container size in CSS pixels.
    pub container: Vec2,
    /// Target canvas resolution.
    pub canvas: Canvas,
    /// Render pixels per CSS pixel of the stage surface.
    pub resolution_scale: f64,
    /// Live render tree of the current frame.
    pub tree: &'a dyn RenderTree,
}

/// Resolve a screen-space click to the topmost active clip under it.
///
/// Returns `None` for empty space, which callers treat as "clear the
/// selection" rather than "leave it unchanged".
///
/// Iteration runs bottom-to-top over layers and clips and does not
/// short-circuit on a hit: a later (higher) matching clip overwrites an
/// earlier one, so visible stacking order and hit priority stay aligned.
pub fn resolve(screen: Point, ctx: &HitTestContext<'_>) -> Option<String> {
    let render_pt = screen_to_render(screen, ctx);

    let mut hit: Option<String> = None;
    for layer in ctx.layers {
        if !layer.kind.is_visual() {
            continue;
        }
        for clip in &layer.clips {
            if !clip.is_active_at(ctx.playhead_s) {
                continue;
            }
            match clip_contains(clip, layer.kind, render_pt, ctx) {
                Ok(true) => hit = Some(clip.id.clone()),
                Ok(false) => {}
                Err(e) => {
                    // Per-candidate failures are expected (a clip may simply
                    // not be rendered this frame); skip, never abort the scan.
                    tracing::debug!(clip = %clip.id, error = %e, "hit-test candidate skipped");
                }
            }
        }
    }
    hit
}

/// Invert the viewport transform and stage placement to get the click point
/// in the scene's render-space coordinates.
fn screen_to_render(screen: Point, ctx: &HitTestContext<'_>) -> Point {
    let css = ctx.transform.screen_to_css(screen, ctx.container);
    let stage = crate::foundation::core::stage_origin(ctx.canvas, ctx.container);
    Point::new(
        (css.x - stage.x) * ctx.resolution_scale,
        (css.y - stage.y) * ctx.resolution_scale,
    )
}

fn clip_contains(
    clip: &Clip,
    layer_kind: LayerKind,
    render_pt: Point,
    ctx: &HitTestContext<'_>,
) -> StageResult<bool> {
    let key = clip
        .node_key(layer_kind)
        .ok_or_else(|| StageError::node_resolution(format!("clip {} has no node", clip.id)))?;
    let node = ctx
        .tree
        .node(&key)
        .ok_or_else(|| StageError::node_resolution(format!("node {key} not in render tree")))?;

    let world = node.world_transform()?;
    if world.determinant().abs() < DET_EPSILON {
        return Err(StageError::geometry(format!(
            "singular world matrix for node {key}"
        )));
    }
    let local = world.inverse() * render_pt;

    let size = node.size();
    if size.x > 0.0 && size.y > 0.0 {
        // Explicit box is centered on the node origin.
        Ok(local.x.abs() <= size.x / 2.0 && local.y.abs() <= size.y / 2.0)
    } else {
        // Container-style nodes report zero size; fall back to the cached
        // content bounding box.
        let bounds = node.content_bounds().ok_or_else(|| {
            StageError::geometry(format!("node {key} has neither size nor content bounds"))
        })?;
        Ok(bounds.contains(local))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hit/tester.rs"]
mod tests;
