//! Game state and session phase
//!
//! Everything the loop mutates lives here. A seed plus the input sequence
//! fully determines a session.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::AsteroidField;
use super::collision::Circle;
use super::registry::{EntityId, Kind, Registry};
use super::ship::Ship;
use crate::settings::Settings;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Explicit quit request
    Quit,
    /// Ship struck by an asteroid
    Collision,
}

impl ExitReason {
    pub fn message(&self) -> &'static str {
        match self {
            ExitReason::Quit => "Game closed. Thanks for playing!",
            ExitReason::Collision => "Hit by an asteroid. Game closed. Thanks for playing!",
        }
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Terminal; there is no resume
    Terminated(ExitReason),
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub registry: Registry,
    pub field: AsteroidField,
    pub ship_id: EntityId,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh session: one ship at the center, an empty field
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut registry = Registry::new();
        let ship_id = registry.spawn(Kind::Ship(Ship::default()), Ship::spawn_body(settings));

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            registry,
            field: AsteroidField::new(),
            ship_id,
            phase: GamePhase::Running,
            time_ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Exit reason once terminated
    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self.phase {
            GamePhase::Running => None,
            GamePhase::Terminated(reason) => Some(reason),
        }
    }

    /// Move to the terminal phase. The first reason sticks.
    pub fn terminate(&mut self, reason: ExitReason) {
        if self.is_running() {
            log::info!("Session over after {} ticks: {:?}", self.time_ticks, reason);
            self.phase = GamePhase::Terminated(reason);
        }
    }

    /// The ship's body
    pub fn ship_body(&self) -> Option<Circle> {
        self.registry.get(self.ship_id).map(|e| e.body)
    }

    /// The ship's control state
    pub fn ship(&self) -> Option<Ship> {
        match self.registry.get(self.ship_id)?.kind {
            Kind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    /// Place an asteroid directly (tests, scripted setups)
    pub fn spawn_asteroid(&mut self, body: Circle) -> EntityId {
        self.registry.spawn(Kind::Asteroid, body)
    }

    /// Place a projectile directly (tests, scripted setups)
    pub fn spawn_projectile(&mut self, body: Circle) -> EntityId {
        self.registry.spawn(Kind::Projectile, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::Groups;
    use glam::Vec2;

    #[test]
    fn test_new_state_has_one_ship() {
        let settings = Settings::default();
        let state = GameState::new(&settings, 12345);

        assert!(state.is_running());
        assert_eq!(state.registry.count(Groups::UPDATABLE), 1);
        assert_eq!(state.registry.count(Groups::ASTEROIDS), 0);
        assert_eq!(state.ship_body().unwrap().pos, Vec2::new(640.0, 360.0));
        assert_eq!(state.ship(), Some(Ship::default()));
    }

    #[test]
    fn test_first_exit_reason_sticks() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);

        state.terminate(ExitReason::Collision);
        state.terminate(ExitReason::Quit);
        assert_eq!(state.exit_reason(), Some(ExitReason::Collision));
        assert!(!state.is_running());
    }

    #[test]
    fn test_exit_messages_differ() {
        assert_ne!(ExitReason::Quit.message(), ExitReason::Collision.message());
        assert!(ExitReason::Collision.message().starts_with("Hit by an asteroid."));
    }
}
