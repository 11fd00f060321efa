//! Boat kinematics
//!
//! The boat is a point on the integer grid (its bow) plus a heading and a speed.
//! Headings are degrees measured from straight down the course; positive
//! headings point to the right (+x).

use rivernav_core::params::BoatConfig;
use rivernav_library::ControlDecision;
use serde::Serialize;

/// Rotate a body-frame offset into the grid frame.
///
/// `(0, 1)` is straight ahead. Rotating by the negated heading keeps positive
/// headings turning to the right.
pub fn rotate_offset(dx: f32, dy: f32, heading_deg: f32) -> (f32, f32) {
    let (sin, cos) = (-heading_deg).to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Pose and speed of the boat
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoatState {
    pub x: i32,
    pub y: i32,
    /// Degrees, positive to the right
    pub heading: f32,
    pub speed: f32,
}

impl BoatState {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            heading: 0.0,
            speed: 0.0,
        }
    }

    /// Starting pose on a segment: centered, with the whole hull inside it
    pub fn at_start(grid_width: usize, limits: &BoatConfig) -> Self {
        Self::new((grid_width / 2) as i32, limits.length as i32)
    }

    /// Apply one controller decision and advance by one step.
    ///
    /// The steering delta accumulates into the heading, clamped to
    /// `±max_angle`; the speed is clamped to `[0, max_speed]`. The position
    /// advances by the fixed step whatever the speed, is rounded to the grid
    /// and has its x clamped to `[0, grid_width - 1]`.
    pub fn advance(&mut self, decision: ControlDecision, limits: &BoatConfig, grid_width: usize) {
        self.heading = (self.heading + decision.steering_delta).clamp(-limits.max_angle, limits.max_angle);
        self.speed = decision.speed.clamp(0.0, limits.max_speed);

        let (dx, dy) = rotate_offset(0.0, limits.step as f32, self.heading);
        let x = (self.x as f32 + dx).round() as i32;
        let y = (self.y as f32 + dy).round() as i32;

        let max_x = grid_width.saturating_sub(1) as i32;
        self.x = x.clamp(0, max_x);
        self.y = y;
    }
}
