//! Asteroids - a real-time asteroid field simulation
//!
//! Core modules:
//! - `sim`: Simulation (entities, groups, ship control, splitting, spawning, collisions)
//! - `game_loop`: Frame loop and the input/render/pacing seams it drives
//! - `autopilot`: Demo pilot that flies the ship from rendered frames
//! - `settings`: Validated, immutable game configuration

pub mod autopilot;
pub mod game_loop;
pub mod settings;
pub mod sim;

pub use game_loop::{
    FixedStep, Frame, FrameClock, FramePacer, InputSource, RenderSink, RunSummary, run,
};
pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Default configuration values
pub mod consts {
    /// Field dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Number of asteroid sizes (radius = ASTEROID_MIN_RADIUS * kind)
    pub const ASTEROID_KINDS: u32 = 3;
    /// Seconds between edge spawns
    pub const ASTEROID_SPAWN_RATE: f32 = 0.8;
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    /// Spawn speed range (pixels/s, inclusive)
    pub const ASTEROID_SPEED_MIN: u32 = 40;
    pub const ASTEROID_SPEED_MAX: u32 = 100;
    /// Max random deviation from the edge direction (degrees)
    pub const ASTEROID_SPREAD_DEGREES: u32 = 30;
    /// Largest spread accepted from configuration
    pub const MAX_SPREAD_DEGREES: u32 = 180;

    /// Split children deflection range (degrees)
    pub const SPLIT_ANGLE_MIN: f32 = 20.0;
    pub const SPLIT_ANGLE_MAX: f32 = 50.0;
    /// Split children speed multiplier
    pub const SPLIT_SPEED_BOOST: f32 = 1.2;

    pub const SHIP_RADIUS: f32 = 20.0;
    pub const SHIP_SPEED: f32 = 200.0;
    /// Degrees per second
    pub const SHIP_TURN_RATE: f32 = 300.0;

    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 500.0;
    /// Seconds between shots
    pub const PROJECTILE_COOLDOWN: f32 = 0.3;

    /// Target ticks per second
    pub const TARGET_FPS: u32 = 60;
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit vector for a facing angle; 0° points along +Y
#[inline]
pub fn heading(facing_degrees: f32) -> Vec2 {
    rotate_degrees(Vec2::Y, facing_degrees)
}
