//! Player ship control
//!
//! The ship has no states beyond alive: each tick it applies whatever the
//! input snapshot asks for. Quitting is the loop's business, not the ship's.

use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::heading;
use crate::settings::{ProjectileSettings, Settings, ShipSettings};

/// Control intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust_forward: bool,
    pub thrust_backward: bool,
    pub fire: bool,
    /// End the session at the top of the tick
    pub quit: bool,
}

impl ControlInput {
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }
}

/// Ship-only state carried alongside its body
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Ship {
    /// Degrees; 0 points along +Y
    pub facing: f32,
    /// Seconds until the next shot is allowed (may go negative)
    pub fire_cooldown: f32,
}

impl Ship {
    /// Body for a fresh ship at the field center
    pub fn spawn_body(settings: &Settings) -> Circle {
        Circle::new(settings.screen.center(), settings.ship.radius)
    }

    /// Turn by `turn_rate * dt`; negative dt turns left
    pub fn rotate(&mut self, dt: f32, settings: &ShipSettings) {
        self.facing += settings.turn_rate * dt;
    }

    /// Move along the facing direction; negative dt moves backward
    pub fn thrust(&self, body: &mut Circle, dt: f32, settings: &ShipSettings) {
        body.pos += heading(self.facing) * settings.speed * dt;
    }

    /// Body of a new projectile if the cooldown has elapsed, else None
    pub fn fire(&mut self, body: &Circle, settings: &ProjectileSettings) -> Option<Circle> {
        if self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = settings.cooldown;
        Some(
            Circle::new(body.pos, settings.radius)
                .with_velocity(heading(self.facing) * settings.speed),
        )
    }

    /// Apply one tick of input. Returns the fired projectile, if any.
    pub fn update(
        &mut self,
        body: &mut Circle,
        input: &ControlInput,
        dt: f32,
        settings: &Settings,
    ) -> Option<Circle> {
        self.fire_cooldown -= dt;

        if input.rotate_left {
            self.rotate(-dt, &settings.ship);
        }
        if input.rotate_right {
            self.rotate(dt, &settings.ship);
        }
        if input.thrust_forward {
            self.thrust(body, dt, &settings.ship);
        }
        if input.thrust_backward {
            self.thrust(body, -dt, &settings.ship);
        }
        if input.fire {
            return self.fire(body, &settings.projectile);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn ship_at_origin(settings: &Settings) -> (Ship, Circle) {
        (Ship::default(), Circle::new(Vec2::ZERO, settings.ship.radius))
    }

    #[test]
    fn test_rotate_sign() {
        let settings = Settings::default();
        let mut ship = Ship::default();
        ship.rotate(0.5, &settings.ship);
        assert_eq!(ship.facing, 150.0);
        ship.rotate(-1.0, &settings.ship);
        assert_eq!(ship.facing, -150.0);
    }

    #[test]
    fn test_thrust_forward_and_back() {
        let settings = Settings::default();
        let (ship, mut body) = ship_at_origin(&settings);

        ship.thrust(&mut body, 0.5, &settings.ship);
        assert!((body.pos - Vec2::new(0.0, 100.0)).length() < 1e-4);

        ship.thrust(&mut body, -0.5, &settings.ship);
        assert!(body.pos.length() < 1e-4);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let settings = Settings::default();
        let (mut ship, body) = ship_at_origin(&settings);

        let shot = ship.fire(&body, &settings.projectile).unwrap();
        assert_eq!(shot.pos, body.pos);
        assert_eq!(shot.radius, settings.projectile.radius);
        assert!((shot.vel - Vec2::new(0.0, 500.0)).length() < 1e-3);
        assert_eq!(ship.fire_cooldown, settings.projectile.cooldown);

        // Second shot is silently dropped, cooldown untouched
        assert!(ship.fire(&body, &settings.projectile).is_none());
        assert_eq!(ship.fire_cooldown, settings.projectile.cooldown);
    }

    #[test]
    fn test_update_counts_down_cooldown() {
        let settings = Settings::default();
        let (mut ship, mut body) = ship_at_origin(&settings);
        let fire = ControlInput {
            fire: true,
            ..Default::default()
        };

        assert!(ship.update(&mut body, &fire, 0.0, &settings).is_some());
        assert!(ship.update(&mut body, &fire, 0.2, &settings).is_none());
        // Cooldown crosses zero on this tick
        assert!(ship.update(&mut body, &fire, 0.1 + 1e-4, &settings).is_some());
    }

    #[test]
    fn test_cooldown_goes_negative_when_idle() {
        let settings = Settings::default();
        let (mut ship, mut body) = ship_at_origin(&settings);
        ship.update(&mut body, &ControlInput::default(), 1.0, &settings);
        ship.update(&mut body, &ControlInput::default(), 1.0, &settings);
        assert_eq!(ship.fire_cooldown, -2.0);
    }

    #[test]
    fn test_opposing_inputs_cancel() {
        let settings = Settings::default();
        let (mut ship, mut body) = ship_at_origin(&settings);
        let input = ControlInput {
            rotate_left: true,
            rotate_right: true,
            thrust_forward: true,
            thrust_backward: true,
            ..Default::default()
        };
        ship.update(&mut body, &input, 0.25, &settings);
        assert!(ship.facing.abs() < 1e-4);
        assert!(body.pos.length() < 1e-3);
    }

    #[test]
    fn test_shot_follows_facing() {
        let settings = Settings::default();
        let (mut ship, mut body) = ship_at_origin(&settings);
        ship.facing = 90.0;
        let input = ControlInput {
            fire: true,
            ..Default::default()
        };
        let shot = ship.update(&mut body, &input, 0.0, &settings).unwrap();
        assert!((shot.vel - Vec2::new(-500.0, 0.0)).length() < 1e-2);
    }

    #[test]
    fn test_spawn_body_at_center() {
        let settings = Settings::default();
        let body = Ship::spawn_body(&settings);
        assert_eq!(body.pos, Vec2::new(640.0, 360.0));
        assert_eq!(body.radius, 20.0);
        assert_eq!(body.vel, Vec2::ZERO);
    }
}
