//! Entity storage and group membership
//!
//! Entities live in one id-ordered vector. Each carries the set of groups it
//! belongs to; the set is fixed by its kind at spawn time and only ever
//! cleared (on death). Dead entities stay in storage, invisible to every
//! query, until `prune` runs at the end of a tick.

use bitflags::bitflags;
use serde::Serialize;

use super::collision::Circle;
use super::ship::Ship;

/// Stable entity identifier, assigned in spawn order
pub type EntityId = u64;

bitflags! {
    /// Named membership sets
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Groups: u8 {
        /// Advanced every tick
        const UPDATABLE = 1 << 0;
        /// Handed to the render sink
        const DRAWABLE = 1 << 1;
        /// Asteroid side of collision checks
        const ASTEROIDS = 1 << 2;
        /// Projectile side of collision checks
        const PROJECTILES = 1 << 3;
    }
}

/// Closed set of entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Kind {
    Ship(Ship),
    Projectile,
    Asteroid,
}

impl Kind {
    /// Groups an entity of this kind joins when spawned
    pub fn groups(&self) -> Groups {
        match self {
            Kind::Ship(_) => Groups::UPDATABLE | Groups::DRAWABLE,
            Kind::Projectile => Groups::UPDATABLE | Groups::DRAWABLE | Groups::PROJECTILES,
            Kind::Asteroid => Groups::UPDATABLE | Groups::DRAWABLE | Groups::ASTEROIDS,
        }
    }

    pub fn is_asteroid(&self) -> bool {
        matches!(self, Kind::Asteroid)
    }
}

/// A live or dead entity
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: Kind,
    pub body: Circle,
    #[serde(skip)]
    groups: Groups,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn groups(&self) -> Groups {
        self.groups
    }

    pub fn in_group(&self, group: Groups) -> bool {
        self.groups.contains(group)
    }

    /// Leave every group. Returns false if already dead.
    fn kill(&mut self) -> bool {
        let was_alive = self.is_alive();
        self.groups = Groups::empty();
        was_alive
    }
}

/// Owns every entity of a session
#[derive(Debug, Clone)]
pub struct Registry {
    /// Sorted by id (ids are handed out in increasing order)
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an entity; its groups come from its kind
    pub fn spawn(&mut self, kind: Kind, body: Circle) -> EntityId {
        debug_assert!(body.radius > 0.0, "spawned entity needs a positive radius");
        let id = self.next_id;
        // Ids never wrap
        self.next_id = self.next_id.saturating_add(1);
        self.entities.push(Entity {
            id,
            groups: kind.groups(),
            kind,
            body,
        });
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Live entity by id
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id)
            .map(|i| &self.entities[i])
            .filter(|e| e.is_alive())
    }

    /// Live entity by id, mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let i = self.index_of(id)?;
        let entity = &mut self.entities[i];
        entity.is_alive().then_some(entity)
    }

    /// Remove an entity from every group. Returns false for unknown or
    /// already-dead ids so callers can refuse to act twice.
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(i) => self.entities[i].kill(),
            None => false,
        }
    }

    /// Live members of a group, in id order
    pub fn iter(&self, group: Groups) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.in_group(group))
    }

    /// Live members of a group, mutably
    pub fn iter_mut(&mut self, group: Groups) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(move |e| e.in_group(group))
    }

    /// Snapshot of a group's ids, safe to hold while mutating the registry
    pub fn ids(&self, group: Groups) -> Vec<EntityId> {
        self.iter(group).map(|e| e.id).collect()
    }

    pub fn count(&self, group: Groups) -> usize {
        self.iter(group).count()
    }

    /// Drop dead entities from storage. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_alive);
        before - self.entities.len()
    }

    /// Stored entities including not-yet-pruned dead ones
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn rock(x: f32) -> Circle {
        Circle::new(Vec2::new(x, 0.0), 20.0)
    }

    #[test]
    fn test_membership_by_kind() {
        let mut registry = Registry::new();
        let ship = registry.spawn(Kind::Ship(Ship::default()), rock(0.0));
        let shot = registry.spawn(Kind::Projectile, Circle::new(Vec2::ZERO, 5.0));
        let asteroid = registry.spawn(Kind::Asteroid, rock(100.0));

        assert_eq!(registry.ids(Groups::UPDATABLE), vec![ship, shot, asteroid]);
        assert_eq!(registry.ids(Groups::DRAWABLE), vec![ship, shot, asteroid]);
        assert_eq!(registry.ids(Groups::ASTEROIDS), vec![asteroid]);
        assert_eq!(registry.ids(Groups::PROJECTILES), vec![shot]);
    }

    #[test]
    fn test_kill_removes_from_all_groups() {
        let mut registry = Registry::new();
        let asteroid = registry.spawn(Kind::Asteroid, rock(0.0));

        assert!(registry.kill(asteroid));
        assert!(registry.get(asteroid).is_none());
        assert!(registry.get_mut(asteroid).is_none());
        for group in [
            Groups::UPDATABLE,
            Groups::DRAWABLE,
            Groups::ASTEROIDS,
            Groups::PROJECTILES,
        ] {
            assert_eq!(registry.count(group), 0);
        }
    }

    #[test]
    fn test_double_kill_is_rejected() {
        let mut registry = Registry::new();
        let asteroid = registry.spawn(Kind::Asteroid, rock(0.0));

        assert!(registry.kill(asteroid));
        assert!(!registry.kill(asteroid));
        assert!(!registry.kill(999));
    }

    #[test]
    fn test_prune_keeps_order_and_ids() {
        let mut registry = Registry::new();
        let a = registry.spawn(Kind::Asteroid, rock(0.0));
        let b = registry.spawn(Kind::Asteroid, rock(1.0));
        let c = registry.spawn(Kind::Asteroid, rock(2.0));
        registry.kill(b);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.prune(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(Groups::ASTEROIDS), vec![a, c]);

        // Ids are never reused
        let d = registry.spawn(Kind::Asteroid, rock(3.0));
        assert!(d > c);
        assert!(registry.get(b).is_none());
    }

    #[test]
    fn test_ids_keep_counting_past_u32() {
        let mut registry = Registry::new();
        registry.next_id = u64::from(u32::MAX);

        let a = registry.spawn(Kind::Asteroid, rock(0.0));
        let b = registry.spawn(Kind::Asteroid, rock(1.0));
        assert_eq!(a, u64::from(u32::MAX));
        assert_eq!(b, a + 1);
        assert_eq!(registry.ids(Groups::ASTEROIDS), vec![a, b]);
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn test_iter_mut_only_touches_group() {
        let mut registry = Registry::new();
        let shot = registry.spawn(Kind::Projectile, Circle::new(Vec2::ZERO, 5.0));
        let asteroid = registry.spawn(Kind::Asteroid, rock(0.0));

        for entity in registry.iter_mut(Groups::PROJECTILES) {
            entity.body.pos.x = 42.0;
        }
        assert_eq!(registry.get(shot).unwrap().body.pos.x, 42.0);
        assert_eq!(registry.get(asteroid).unwrap().body.pos.x, 0.0);
    }
}
