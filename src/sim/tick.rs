//! Per-tick simulation step
//!
//! Fixed order: quit check, update, collisions, prune. Rendering and pacing
//! happen in the frame loop around this.

use std::ops::AddAssign;

use super::asteroid::{Split, split_asteroid};
use super::registry::{Groups, Kind};
use super::ship::ControlInput;
use super::state::{ExitReason, GameState};
use crate::settings::Settings;

/// What happened during one tick (or, summed, a whole session)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub projectiles_fired: u32,
    pub asteroids_spawned: u32,
    pub asteroids_split: u32,
    pub asteroids_destroyed: u32,
    pub projectiles_consumed: u32,
    /// Projectiles dropped for leaving the field
    pub projectiles_culled: u32,
}

impl AddAssign for TickStats {
    fn add_assign(&mut self, rhs: Self) {
        self.projectiles_fired += rhs.projectiles_fired;
        self.asteroids_spawned += rhs.asteroids_spawned;
        self.asteroids_split += rhs.asteroids_split;
        self.asteroids_destroyed += rhs.asteroids_destroyed;
        self.projectiles_consumed += rhs.projectiles_consumed;
        self.projectiles_culled += rhs.projectiles_culled;
    }
}

/// Advance the game by one tick of `dt` seconds
///
/// A quit request terminates the session before anything moves. Once
/// terminated, further calls do nothing.
pub fn tick(state: &mut GameState, settings: &Settings, input: &ControlInput, dt: f32) -> TickStats {
    let mut stats = TickStats::default();

    if !state.is_running() {
        return stats;
    }
    if input.quit {
        state.terminate(ExitReason::Quit);
        return stats;
    }

    state.time_ticks += 1;

    update(state, settings, input, dt, &mut stats);
    resolve_collisions(state, settings, &mut stats);
    state.registry.prune();

    log::trace!("Tick {}: {:?}", state.time_ticks, stats);
    stats
}

/// Move everything, apply ship controls, run the spawner
fn update(
    state: &mut GameState,
    settings: &Settings,
    input: &ControlInput,
    dt: f32,
    stats: &mut TickStats,
) {
    let mut fired = None;
    let mut culled = Vec::new();

    for entity in state.registry.iter_mut(Groups::UPDATABLE) {
        match &mut entity.kind {
            Kind::Ship(ship) => {
                fired = ship.update(&mut entity.body, input, dt, settings);
            }
            Kind::Projectile => {
                entity.body.advance(dt);
                if settings.projectile.despawn_off_field
                    && entity
                        .body
                        .is_outside(settings.screen.width, settings.screen.height)
                {
                    culled.push(entity.id);
                }
            }
            Kind::Asteroid => entity.body.advance(dt),
        }
    }

    for id in culled {
        if state.registry.kill(id) {
            stats.projectiles_culled += 1;
        }
    }

    if let Some(shot) = fired {
        state.spawn_projectile(shot);
        stats.projectiles_fired += 1;
    }

    if let Some(body) = state.field.update(dt, settings, &mut state.rng) {
        let id = state.spawn_asteroid(body);
        stats.asteroids_spawned += 1;
        log::debug!(
            "Spawned asteroid {} r={} at ({:.0}, {:.0})",
            id,
            body.radius,
            body.pos.x,
            body.pos.y
        );
    }
}

/// Ship vs asteroids, then projectiles vs asteroids
///
/// Both passes run every tick, even when the ship pass ends the session.
/// Asteroids created by splits are not tested until the next tick.
fn resolve_collisions(state: &mut GameState, settings: &Settings, stats: &mut TickStats) {
    if let Some(ship) = state.ship_body() {
        let hit = state
            .registry
            .iter(Groups::ASTEROIDS)
            .find(|asteroid| asteroid.body.is_colliding(&ship))
            .map(|asteroid| asteroid.id);
        if let Some(asteroid_id) = hit {
            log::info!("Ship hit by asteroid {}", asteroid_id);
            state.terminate(ExitReason::Collision);
        }
    }

    let asteroid_ids = state.registry.ids(Groups::ASTEROIDS);
    let projectile_ids = state.registry.ids(Groups::PROJECTILES);

    for &asteroid_id in &asteroid_ids {
        for &projectile_id in &projectile_ids {
            let Some(asteroid) = state.registry.get(asteroid_id) else {
                break;
            };
            let Some(projectile) = state.registry.get(projectile_id) else {
                continue;
            };
            if !asteroid.body.is_colliding(&projectile.body) {
                continue;
            }

            state.registry.kill(projectile_id);
            stats.projectiles_consumed += 1;

            match split_asteroid(
                &mut state.registry,
                asteroid_id,
                settings.asteroid.min_radius,
                &mut state.rng,
            ) {
                Split::Split(_) => stats.asteroids_split += 1,
                Split::Destroyed => stats.asteroids_destroyed += 1,
                Split::Stale => {}
            }
        }
    }
}
