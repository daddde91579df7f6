use crate::foundation::core::Vec2;

/// Per-frame velocity decay factor.
const DECAY: f64 = 0.95;
/// Velocity floor, px/frame; below it on both axes the animation halts.
const HALT_BELOW: f64 = 0.5;

/// Decaying free-running pan animation started on touch release.
///
/// Each [`Self::step`] yields the pan delta for one frame and decays the
/// velocity; once both components fall under the halt threshold the animation
/// is finished and never yields again. Cancellation is dropping the value.
#[derive(Clone, Copy, Debug)]
pub struct Momentum {
    velocity: Vec2,
}

impl Momentum {
    /// Start a momentum animation with an initial velocity in px/frame.
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }

    /// Advance one frame.
    ///
    /// Returns the pan delta to apply, or `None` once the animation has
    /// terminated.
    pub fn step(&mut self) -> Option<Vec2> {
        if self.is_finished() {
            return None;
        }
        let delta = self.velocity;
        self.velocity *= DECAY;
        Some(delta)
    }

    /// Whether both velocity components are under the halt threshold.
    pub fn is_finished(&self) -> bool {
        self.velocity.x.abs() < HALT_BELOW && self.velocity.y.abs() < HALT_BELOW
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/momentum.rs"]
mod tests;
