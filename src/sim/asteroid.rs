//! Asteroid splitting and the edge spawner

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::registry::{EntityId, Kind, Registry};
use crate::consts::{MAX_SPREAD_DEGREES, SPLIT_ANGLE_MAX, SPLIT_ANGLE_MIN, SPLIT_SPEED_BOOST};
use crate::rotate_degrees;
use crate::settings::Settings;

/// What a split request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// Target was already dead (or not an asteroid); nothing changed
    Stale,
    /// Smallest size: destroyed, no children
    Destroyed,
    /// Destroyed and replaced by two smaller asteroids
    Split([EntityId; 2]),
}

/// Child velocities for a split at `angle` degrees
pub fn split_velocities(parent_vel: Vec2, angle: f32) -> [Vec2; 2] {
    [
        rotate_degrees(parent_vel, angle) * SPLIT_SPEED_BOOST,
        rotate_degrees(parent_vel, -angle) * SPLIT_SPEED_BOOST,
    ]
}

/// Size class of a radius: the nearest `k` with `radius ≈ min_radius * k`
pub fn size_class(radius: f32, min_radius: f32) -> u32 {
    (radius / min_radius).round().max(0.0) as u32
}

/// Destroy an asteroid and, unless it is already the smallest size, replace
/// it with two children one size class down (`R - min_radius`) flying apart
/// from the parent's position.
///
/// Child radii are rebuilt from the size class so they stay exact multiples
/// of `min_radius` however many times a rock is split.
pub fn split_asteroid<R: Rng>(
    registry: &mut Registry,
    id: EntityId,
    min_radius: f32,
    rng: &mut R,
) -> Split {
    let parent = match registry.get(id) {
        Some(entity) if entity.kind.is_asteroid() => entity.body,
        Some(entity) => {
            log::warn!("Refusing to split non-asteroid entity {} ({:?})", id, entity.kind);
            return Split::Stale;
        }
        None => {
            log::warn!("Refusing to split dead asteroid {}", id);
            return Split::Stale;
        }
    };

    registry.kill(id);

    let size = size_class(parent.radius, min_radius);
    if size <= 1 {
        log::debug!("Asteroid {} destroyed", id);
        return Split::Destroyed;
    }

    let angle = rng.random_range(SPLIT_ANGLE_MIN..=SPLIT_ANGLE_MAX);
    let radius = min_radius * (size - 1) as f32;
    let [vel_a, vel_b] = split_velocities(parent.vel, angle);

    let a = registry.spawn(
        Kind::Asteroid,
        Circle::new(parent.pos, radius).with_velocity(vel_a),
    );
    let b = registry.spawn(
        Kind::Asteroid,
        Circle::new(parent.pos, radius).with_velocity(vel_b),
    );
    log::debug!(
        "Asteroid {} (r={}) split into {} and {} (r={}, ±{:.1}°)",
        id,
        parent.radius,
        a,
        b,
        radius,
        angle
    );
    Split::Split([a, b])
}

/// Field edge asteroids enter from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Unit direction pointing into the field
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Point `t` (0..=1) along the edge, pushed out by `margin`
    pub fn point(self, t: f32, width: f32, height: f32, margin: f32) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(-margin, t * height),
            Edge::Right => Vec2::new(width + margin, t * height),
            Edge::Top => Vec2::new(t * width, -margin),
            Edge::Bottom => Vec2::new(t * width, height + margin),
        }
    }
}

/// Timed spawner. Owns no entities; it only produces bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsteroidField {
    /// Seconds accumulated since the last spawn
    pub spawn_timer: f32,
}

impl AsteroidField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `dt`; once past the spawn rate, reset and roll one asteroid
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        settings: &Settings,
        rng: &mut R,
    ) -> Option<Circle> {
        self.spawn_timer += dt;
        if self.spawn_timer <= settings.asteroid.spawn_rate {
            return None;
        }
        self.spawn_timer = 0.0;
        Some(roll_spawn(settings, rng))
    }
}

/// A random asteroid body entering from a random edge
pub fn roll_spawn<R: Rng>(settings: &Settings, rng: &mut R) -> Circle {
    let cfg = &settings.asteroid;

    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let speed = rng.random_range(cfg.speed_min..=cfg.speed_max) as f32;
    // Keeps the range non-empty for unvalidated settings
    let spread = cfg.spread_degrees.min(MAX_SPREAD_DEGREES) as i32;
    let deviation = rng.random_range(-spread..=spread) as f32;
    let vel = rotate_degrees(edge.inward() * speed, deviation);

    let t: f32 = rng.random_range(0.0..=1.0);
    let pos = edge.point(t, settings.screen.width, settings.screen.height, cfg.max_radius());

    let kind = rng.random_range(1..=cfg.kinds);
    let radius = cfg.min_radius * kind as f32;

    Circle::new(pos, radius).with_velocity(vel)
}
