//! Demo pilot
//!
//! Flies the ship from what the render sink sees: turn toward the nearest
//! asteroid, fire when roughly lined up, back off when it gets close. Used
//! by the headless binary so a session does something without a keyboard.

use glam::Vec2;

use crate::game_loop::Frame;
use crate::heading;
use crate::settings::Settings;
use crate::sim::ControlInput;

/// Fire when the target is within this many degrees of the nose
pub const FIRE_CONE_DEGREES: f32 = 10.0;

/// Back off when the gap to the target drops below this many ship radii
pub const RETREAT_RADII: f32 = 4.0;

/// What the pilot decided from the last frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct Plan {
    /// Signed turn to the target (degrees, positive is counter-clockwise)
    turn: f32,
    /// Surface-to-surface distance to the target
    gap: f32,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Turns smaller than this are left alone to avoid jitter
    deadband: f32,
    retreat_gap: f32,
    plan: Option<Plan>,
}

impl Autopilot {
    pub fn new(settings: &Settings) -> Self {
        let per_tick = settings.ship.turn_rate / settings.fps.max(1) as f32;
        Self {
            deadband: per_tick * 0.5,
            retreat_gap: settings.ship.radius * RETREAT_RADII,
            plan: None,
        }
    }

    /// Pick a target from a rendered frame
    pub fn observe(&mut self, frame: &Frame<'_>) {
        self.plan = None;

        let (Some(ship), Some(control)) = (frame.ship(), frame.ship_state()) else {
            return;
        };
        let pos = ship.body.pos;

        let nearest = frame
            .asteroids()
            .map(|a| (a.body.pos, pos.distance(a.body.pos) - a.body.radius - ship.body.radius))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((target, gap)) = nearest {
            self.plan = Some(Plan {
                turn: signed_turn(heading(control.facing), target - pos),
                gap,
            });
        }
    }

    /// Controls for the next tick
    pub fn next_input(&self) -> ControlInput {
        let Some(plan) = self.plan else {
            return ControlInput::default();
        };

        ControlInput {
            rotate_left: plan.turn < -self.deadband,
            rotate_right: plan.turn > self.deadband,
            thrust_backward: plan.gap < self.retreat_gap,
            fire: plan.turn.abs() <= FIRE_CONE_DEGREES,
            ..Default::default()
        }
    }
}

/// Signed angle from `from` to `to` in degrees, in (-180, 180]
pub fn signed_turn(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to)).to_degrees()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::game_loop::{FixedStep, run};
    use crate::sim::{Circle, GameState, TickStats};

    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        settings.asteroid.spawn_rate = 1_000.0;
        settings
    }

    fn decide(state: &GameState, settings: &Settings) -> ControlInput {
        let mut pilot = Autopilot::new(settings);
        pilot.observe(&Frame::new(state, TickStats::default()));
        pilot.next_input()
    }

    #[test]
    fn test_signed_turn() {
        assert!((signed_turn(Vec2::Y, Vec2::NEG_X) - 90.0).abs() < 1e-4);
        assert!((signed_turn(Vec2::Y, Vec2::X) + 90.0).abs() < 1e-4);
        assert!(signed_turn(Vec2::Y, Vec2::new(0.0, 5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_idle_without_targets() {
        let settings = quiet_settings();
        let state = GameState::new(&settings, 1);
        assert_eq!(decide(&state, &settings), ControlInput::default());
    }

    #[test]
    fn test_fires_at_target_dead_ahead() {
        let settings = quiet_settings();
        let mut state = GameState::new(&settings, 1);
        state.spawn_asteroid(Circle::new(settings.screen.center() + Vec2::new(0.0, 300.0), 40.0));

        let input = decide(&state, &settings);
        assert!(input.fire);
        assert!(!input.rotate_left && !input.rotate_right);
        assert!(!input.thrust_backward);
    }

    #[test]
    fn test_turns_toward_target() {
        let settings = quiet_settings();
        let mut state = GameState::new(&settings, 1);
        // Ship faces +Y; a target along +X is a clockwise turn
        state.spawn_asteroid(Circle::new(settings.screen.center() + Vec2::new(300.0, 0.0), 40.0));

        let input = decide(&state, &settings);
        assert!(input.rotate_left);
        assert!(!input.rotate_right);
        assert!(!input.fire);
    }

    #[test]
    fn test_picks_nearest_surface() {
        let settings = quiet_settings();
        let mut state = GameState::new(&settings, 1);
        let center = settings.screen.center();
        // The big one on the left is closer by surface distance
        state.spawn_asteroid(Circle::new(center + Vec2::new(250.0, 0.0), 20.0));
        state.spawn_asteroid(Circle::new(center + Vec2::new(-280.0, 0.0), 60.0));

        let input = decide(&state, &settings);
        assert!(input.rotate_right);
    }

    #[test]
    fn test_backs_off_when_close() {
        let settings = quiet_settings();
        let mut state = GameState::new(&settings, 1);
        state.spawn_asteroid(Circle::new(settings.screen.center() + Vec2::new(0.0, 70.0), 20.0));

        let input = decide(&state, &settings);
        assert!(input.thrust_backward);
        assert!(input.fire);
    }

    #[test]
    fn test_flies_a_session() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 2024);
        let pilot = RefCell::new(Autopilot::new(&settings));
        let mut polls = 0;

        let summary = run(
            &mut state,
            &settings,
            &mut || {
                polls += 1;
                if polls > 600 {
                    ControlInput::quit()
                } else {
                    pilot.borrow().next_input()
                }
            },
            &mut |frame: &Frame<'_>| pilot.borrow_mut().observe(frame),
            &mut FixedStep,
        );

        assert!(summary.ticks > 0);
        assert!(summary.totals.asteroids_spawned > 0);
        assert!(summary.totals.projectiles_fired > 0);
    }
}
