//! Simulation module
//!
//! All gameplay logic lives here. No rendering, input devices or clocks:
//! - Time only enters as the `dt` handed to `tick`
//! - Randomness only from the seeded RNG in `GameState`
//! - Stable iteration order (by entity ID)

pub mod asteroid;
pub mod collision;
pub mod registry;
pub mod ship;
pub mod state;
pub mod tick;

pub use asteroid::{
    AsteroidField, Edge, Split, roll_spawn, size_class, split_asteroid, split_velocities,
};
pub use collision::{Circle, is_colliding};
pub use registry::{Entity, EntityId, Groups, Kind, Registry};
pub use ship::{ControlInput, Ship};
pub use state::{ExitReason, GamePhase, GameState};
pub use tick::{TickStats, tick};
