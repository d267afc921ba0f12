//! Circle bodies and the overlap test
//!
//! Every entity is a circle. There is no broad phase: the resolver tests
//! pairs brute force, which is fine at the entity counts this game reaches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position, velocity and radius shared by every entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Circle {
    /// A stationary circle; the creator sets the velocity
    pub fn new(pos: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "circle radius must be positive");
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Passive motion
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// True if the two circles touch or overlap
    #[inline]
    pub fn is_colliding(&self, other: &Circle) -> bool {
        is_colliding(self, other)
    }

    /// True if the circle lies entirely outside `[0, width] x [0, height]`
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.y + self.radius < 0.0
            || self.pos.x - self.radius > width
            || self.pos.y - self.radius > height
    }
}

/// Circle-circle test; touching counts as a hit
#[inline]
pub fn is_colliding(a: &Circle, b: &Circle) -> bool {
    a.pos.distance(b.pos) <= a.radius + b.radius
}
