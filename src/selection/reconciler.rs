use crate::foundation::core::{
    Canvas, Point, Rect, Vec2, ViewportTransform, stage_origin,
};
use crate::foundation::error::{StageError, StageResult};
use crate::scene::runtime::SceneNode;

/// How long the optimistic rect keeps being displayed after release, giving
/// the scene runtime time to catch up to the final state.
const GRACE_MS: f64 = 500.0;
/// Minimum per-axis clip scale reachable through a resize.
const MIN_SCALE: f64 = 0.05;
/// Minimum on-screen rect dimension while resizing.
const MIN_RECT_PX: f64 = 1.0;

/// The eight resize handles around a selection box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl Handle {
    /// Which edges this handle moves, as `(ex, ey)` signs: `+1` for the
    /// east/south edge, `-1` for west/north, `0` for a fixed axis.
    fn edges(self) -> (f64, f64) {
        match self {
            Handle::N => (0.0, -1.0),
            Handle::S => (0.0, 1.0),
            Handle::E => (1.0, 0.0),
            Handle::W => (-1.0, 0.0),
            Handle::Ne => (1.0, -1.0),
            Handle::Nw => (-1.0, -1.0),
            Handle::Se => (1.0, 1.0),
            Handle::Sw => (-1.0, 1.0),
        }
    }
}

/// What kind of direct manipulation is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    /// Moving the whole box.
    Drag,
    /// Resizing via one of the eight handles.
    Resize(Handle),
}

/// Position/scale update the host applies to the underlying clip data on
/// every pointer move during an interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipUpdate {
    /// Target clip.
    pub clip_id: String,
    /// New position in scene units.
    pub position: Vec2,
    /// New per-axis scale.
    pub scale: Vec2,
}

#[derive(Clone, Debug)]
struct Interaction {
    mode: InteractionMode,
    clip_id: String,
    start_pointer: Point,
    start_rect: Rect,
    start_position: Vec2,
    start_scale: Vec2,
}

/// Produces the on-screen selection rectangle, blending an authoritative
/// scene-derived rect with an optimistic pointer-derived one.
///
/// During a drag or resize the optimistic rect is computed purely from screen
/// deltas so feedback is instant; the authoritative rect, recomputed from the
/// live render tree every render tick, takes back over a grace period after
/// release.
#[derive(Debug, Default)]
pub struct SelectionReconciler {
    scene_rect: Option<Rect>,
    optimistic_rect: Option<Rect>,
    use_optimistic: bool,
    revert_deadline_ms: Option<f64>,
    interaction: Option<Interaction>,
}

impl SelectionReconciler {
    /// Create a reconciler with no selection geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rectangle to render right now, in screen pixels.
    pub fn displayed(&self) -> Option<Rect> {
        if self.use_optimistic {
            self.optimistic_rect.or(self.scene_rect)
        } else {
            self.scene_rect
        }
    }

    /// Whether the optimistic rect is currently the displayed one.
    pub fn is_optimistic(&self) -> bool {
        self.use_optimistic
    }

    /// Whether a drag/resize interaction is in progress.
    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Recompute the authoritative rect from the selected node's geometry.
    ///
    /// Called on every scene-runtime render tick. A resolution failure leaves
    /// the previously displayed rect in place (the error is returned for
    /// logging, not surfaced to the user).
    pub fn sync_scene_rect(
        &mut self,
        node: &dyn SceneNode,
        resolution_scale: f64,
        transform: ViewportTransform,
        canvas: Canvas,
        container: Vec2,
    ) -> StageResult<()> {
        let rect = authoritative_rect(node, resolution_scale, transform, canvas, container)?;
        self.scene_rect = Some(rect);
        Ok(())
    }

    /// Drop all selection geometry (selection cleared or clip deleted).
    pub fn clear(&mut self) {
        self.scene_rect = None;
        self.optimistic_rect = None;
        self.use_optimistic = false;
        self.revert_deadline_ms = None;
        self.interaction = None;
    }

    /// Begin a drag or resize at `pointer`, snapshotting the currently
    /// displayed rect and the clip's position/scale as the baseline.
    ///
    /// Starting a new interaction inside the post-release grace window
    /// cancels the pending revert.
    pub fn begin_interaction(
        &mut self,
        mode: InteractionMode,
        clip_id: impl Into<String>,
        pointer: Point,
        clip_position: Vec2,
        clip_scale: Vec2,
    ) -> StageResult<()> {
        let start_rect = self
            .displayed()
            .ok_or_else(|| StageError::geometry("no selection rect to interact with"))?;
        self.interaction = Some(Interaction {
            mode,
            clip_id: clip_id.into(),
            start_pointer: pointer,
            start_rect,
            start_position: clip_position,
            start_scale: clip_scale,
        });
        self.optimistic_rect = Some(start_rect);
        self.use_optimistic = true;
        self.revert_deadline_ms = None;
        Ok(())
    }

    /// Process a pointer move during an interaction.
    ///
    /// Updates the optimistic rect from screen deltas alone (no scene-runtime
    /// dependency) and returns the position/scale update to write into the
    /// clip data.
    pub fn pointer_move(&mut self, pointer: Point, zoom: f64) -> Option<ClipUpdate> {
        let interaction = self.interaction.as_ref()?;
        let delta = pointer - interaction.start_pointer;

        let (rect, update) = match interaction.mode {
            InteractionMode::Drag => drag_update(interaction, delta, zoom),
            InteractionMode::Resize(handle) => resize_update(interaction, handle, delta, zoom),
        };
        self.optimistic_rect = Some(rect);
        Some(update)
    }

    /// End the interaction.
    ///
    /// The optimistic rect stays displayed for a 500 ms grace window before
    /// reverting to the authoritative one. Returns `true` when the host must
    /// suppress the next hit-test click, so releasing on top of another
    /// element does not also select it.
    pub fn end_interaction(&mut self, now_ms: f64) -> bool {
        if self.interaction.take().is_none() {
            return false;
        }
        self.revert_deadline_ms = Some(now_ms + GRACE_MS);
        true
    }

    /// Advance grace-period bookkeeping; called once per frame.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(deadline) = self.revert_deadline_ms
            && now_ms >= deadline
            && self.interaction.is_none()
        {
            self.use_optimistic = false;
            self.revert_deadline_ms = None;
        }
    }
}

/// Transform the node's four local corners to a screen-space AABB.
fn authoritative_rect(
    node: &dyn SceneNode,
    resolution_scale: f64,
    transform: ViewportTransform,
    canvas: Canvas,
    container: Vec2,
) -> StageResult<Rect> {
    let size = node.size();
    let (hw, hh) = if size.x > 0.0 && size.y > 0.0 {
        (size.x / 2.0, size.y / 2.0)
    } else {
        let bounds = node
            .content_bounds()
            .ok_or_else(|| StageError::geometry("node has neither size nor content bounds"))?;
        (bounds.width() / 2.0, bounds.height() / 2.0)
    };
    if resolution_scale <= 0.0 {
        return Err(StageError::geometry("resolution scale must be positive"));
    }

    let world = node.world_transform()?;
    let corners = [
        world * Point::new(-hw, -hh),
        world * Point::new(hw, -hh),
        world * Point::new(-hw, hh),
        world * Point::new(hw, hh),
    ];

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for c in corners {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    }
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return Err(StageError::geometry("non-finite world-space corners"));
    }

    // Render space -> CSS space -> screen space.
    let stage = stage_origin(canvas, container);
    let to_screen = |x: f64, y: f64| {
        transform.css_to_screen(
            Point::new(x / resolution_scale + stage.x, y / resolution_scale + stage.y),
            container,
        )
    };
    let p0 = to_screen(min_x, min_y);
    let p1 = to_screen(max_x, max_y);
    Ok(Rect::new(p0.x, p0.y, p1.x, p1.y))
}

fn drag_update(interaction: &Interaction, delta: Vec2, zoom: f64) -> (Rect, ClipUpdate) {
    let rect = interaction.start_rect + delta;
    let update = ClipUpdate {
        clip_id: interaction.clip_id.clone(),
        position: interaction.start_position + delta / zoom,
        scale: interaction.start_scale,
    };
    (rect, update)
}

fn resize_update(
    interaction: &Interaction,
    handle: Handle,
    delta: Vec2,
    zoom: f64,
) -> (Rect, ClipUpdate) {
    let (ex, ey) = handle.edges();
    let start = interaction.start_rect;

    // World dimensions of the box at interaction start.
    let world_w = start.width() / zoom;
    let world_h = start.height() / zoom;

    let mut scale = interaction.start_scale;
    let mut position = interaction.start_position;
    let mut x0 = start.x0;
    let mut x1 = start.x1;
    let mut y0 = start.y0;
    let mut y1 = start.y1;

    if ex != 0.0 && world_w > 0.0 {
        scale.x = (interaction.start_scale.x * (1.0 + delta.x * ex / world_w)).max(MIN_SCALE);
        // The moving edge follows the pointer; the opposite edge stays
        // anchored, so the center shifts by half the delta.
        position.x = interaction.start_position.x + delta.x / (2.0 * zoom);
        if ex > 0.0 {
            x1 = (x1 + delta.x).max(x0 + MIN_RECT_PX);
        } else {
            x0 = (x0 + delta.x).min(x1 - MIN_RECT_PX);
        }
    }
    if ey != 0.0 && world_h > 0.0 {
        scale.y = (interaction.start_scale.y * (1.0 + delta.y * ey / world_h)).max(MIN_SCALE);
        position.y = interaction.start_position.y + delta.y / (2.0 * zoom);
        if ey > 0.0 {
            y1 = (y1 + delta.y).max(y0 + MIN_RECT_PX);
        } else {
            y0 = (y0 + delta.y).min(y1 - MIN_RECT_PX);
        }
    }

    let update = ClipUpdate {
        clip_id: interaction.clip_id.clone(),
        position,
        scale,
    };
    (Rect::new(x0, y0, x1, y1), update)
}

#[cfg(test)]
#[path = "../../tests/unit/selection/reconciler.rs"]
mod tests;
