//! Game settings
//!
//! Loaded once at startup (defaults or a JSON file), validated, then passed
//! by reference to everything that needs it. Never mutated afterwards.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or wrong field types
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A length, speed or duration that must be > 0
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A count that must be >= 1
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    /// Inverted spawn speed range
    #[error("asteroid.speed_min ({min}) exceeds asteroid.speed_max ({max})")]
    SpeedRange { min: u32, max: u32 },

    /// Spawn spread outside 0..=180 degrees
    #[error("asteroid.spread_degrees must be at most 180, got {value}")]
    Spread { value: u32 },
}

/// Field dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl ScreenSettings {
    /// Ship spawn point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Asteroid sizes and spawner cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidSettings {
    /// Number of sizes; radii are `min_radius * k` for k in 1..=kinds
    pub kinds: u32,
    /// Seconds between edge spawns
    pub spawn_rate: f32,
    pub min_radius: f32,
    /// Inclusive spawn speed range (pixels/s)
    pub speed_min: u32,
    pub speed_max: u32,
    /// Max deviation from the edge direction (degrees, either side)
    pub spread_degrees: u32,
}

impl Default for AsteroidSettings {
    fn default() -> Self {
        Self {
            kinds: ASTEROID_KINDS,
            spawn_rate: ASTEROID_SPAWN_RATE,
            min_radius: ASTEROID_MIN_RADIUS,
            speed_min: ASTEROID_SPEED_MIN,
            speed_max: ASTEROID_SPEED_MAX,
            spread_degrees: ASTEROID_SPREAD_DEGREES,
        }
    }
}

impl AsteroidSettings {
    /// Largest asteroid radius; also the off-screen spawn margin
    pub fn max_radius(&self) -> f32 {
        self.min_radius * self.kinds as f32
    }
}

/// Ship size and handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSettings {
    pub radius: f32,
    /// Pixels per second
    pub speed: f32,
    /// Degrees per second
    pub turn_rate: f32,
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            radius: SHIP_RADIUS,
            speed: SHIP_SPEED,
            turn_rate: SHIP_TURN_RATE,
        }
    }
}

/// Projectile size, speed and fire rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub radius: f32,
    pub speed: f32,
    /// Seconds between shots
    pub cooldown: f32,
    /// Kill projectiles once they are wholly outside the field
    pub despawn_off_field: bool,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            radius: PROJECTILE_RADIUS,
            speed: PROJECTILE_SPEED,
            cooldown: PROJECTILE_COOLDOWN,
            despawn_off_field: false,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub asteroid: AsteroidSettings,
    pub ship: ShipSettings,
    pub projectile: ProjectileSettings,
    /// Target ticks per second
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen: ScreenSettings::default(),
            asteroid: AsteroidSettings::default(),
            ship: ShipSettings::default(),
            projectile: ProjectileSettings::default(),
            fps: TARGET_FPS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Pretty JSON form (used for `--print-config`)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;

        if self.asteroid.kinds == 0 {
            return Err(ConfigError::Zero {
                field: "asteroid.kinds",
            });
        }
        positive("asteroid.spawn_rate", self.asteroid.spawn_rate)?;
        positive("asteroid.min_radius", self.asteroid.min_radius)?;
        if self.asteroid.speed_min == 0 {
            return Err(ConfigError::Zero {
                field: "asteroid.speed_min",
            });
        }
        if self.asteroid.speed_min > self.asteroid.speed_max {
            return Err(ConfigError::SpeedRange {
                min: self.asteroid.speed_min,
                max: self.asteroid.speed_max,
            });
        }
        if self.asteroid.spread_degrees > MAX_SPREAD_DEGREES {
            return Err(ConfigError::Spread {
                value: self.asteroid.spread_degrees,
            });
        }

        positive("ship.radius", self.ship.radius)?;
        positive("ship.speed", self.ship.speed)?;
        positive("ship.turn_rate", self.ship.turn_rate)?;

        positive("projectile.radius", self.projectile.radius)?;
        positive("projectile.speed", self.projectile.speed)?;
        positive("projectile.cooldown", self.projectile.cooldown)?;

        if self.fps == 0 {
            return Err(ConfigError::Zero { field: "fps" });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
