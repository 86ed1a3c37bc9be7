//! Entity registry
//!
//! Owns every live game object. Enemies, projectiles and pickups sit in
//! slot-map arenas so identifiers stay valid across removals and a stale
//! identifier can never address a newer entity.

use slotmap::{new_key_type, SlotMap};
use survivor_engine::foundation::collections::drain_where;
use survivor_engine::foundation::math::Bounds2;

use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::pickup::Pickup;
use crate::player::Player;
use crate::projectile::Projectile;

new_key_type! {
    /// Identifier of a live enemy
    pub struct EnemyId;
    /// Identifier of a live projectile
    pub struct ProjectileId;
    /// Identifier of a pickup on the ground
    pub struct PickupId;
}

/// Live entity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    /// Regular enemies
    pub enemies: usize,
    /// Bosses
    pub bosses: usize,
    /// Projectiles and hitboxes
    pub projectiles: usize,
    /// Pickups on the ground
    pub pickups: usize,
}

/// Everything that lives in the world
#[derive(Debug, Clone)]
pub struct World {
    /// Playable area
    pub bounds: Bounds2,
    /// The player
    pub player: Player,
    /// Enemy arena
    pub enemies: SlotMap<EnemyId, Enemy>,
    /// Projectile arena
    pub projectiles: SlotMap<ProjectileId, Projectile>,
    /// Pickup arena
    pub pickups: SlotMap<PickupId, Pickup>,
}

impl World {
    /// Empty world with the player at its center
    pub fn new(config: &GameConfig) -> Self {
        Self {
            bounds: config.world.bounds(),
            player: Player::new(config.world.center(), config),
            enemies: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            pickups: SlotMap::with_key(),
        }
    }

    /// Add an enemy
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> EnemyId {
        self.enemies.insert(enemy)
    }

    /// Add a projectile
    pub fn spawn_projectile(&mut self, projectile: Projectile) -> ProjectileId {
        self.projectiles.insert(projectile)
    }

    /// Add a pickup
    pub fn spawn_pickup(&mut self, pickup: Pickup) -> PickupId {
        self.pickups.insert(pickup)
    }

    /// Live enemies subject to the spawn cap
    pub fn regular_enemy_count(&self) -> usize {
        self.enemies
            .values()
            .filter(|e| !e.kind.is_boss() && !e.is_dead())
            .count()
    }

    /// Live entity counts
    pub fn counts(&self) -> EntityCounts {
        let bosses = self
            .enemies
            .values()
            .filter(|e| e.kind.is_boss() && !e.is_dead())
            .count();
        EntityCounts {
            enemies: self.regular_enemy_count(),
            bosses,
            projectiles: self.projectiles.len(),
            pickups: self.pickups.len(),
        }
    }

    /// Remove dead enemies and spent projectiles; returns removed enemy ids
    pub fn prune(&mut self) -> Vec<EnemyId> {
        drain_where(&mut self.projectiles, |_, p| p.is_expired());
        drain_where(&mut self.enemies, |_, e| e.is_dead())
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnemyKind;
    use survivor_engine::foundation::math::Vec2;

    #[test]
    fn test_prune_removes_dead_once() {
        let mut world = World::new(&GameConfig::default());
        let a = world.spawn_enemy(Enemy::spawn(EnemyKind::Chaser, Vec2::new(10.0, 10.0), 1.0));
        let b = world.spawn_enemy(Enemy::spawn(EnemyKind::Chaser, Vec2::new(20.0, 10.0), 1.0));
        world.enemies[a].take_damage(100.0, Vec2::zeros());

        assert_eq!(world.prune(), vec![a]);
        assert!(world.prune().is_empty());
        assert!(world.enemies.contains_key(b));
        assert!(!world.enemies.contains_key(a));
    }

    #[test]
    fn test_bosses_counted_separately() {
        let mut world = World::new(&GameConfig::default());
        world.spawn_enemy(Enemy::spawn(EnemyKind::Boss, Vec2::zeros(), 1.0));
        world.spawn_enemy(Enemy::spawn(EnemyKind::Tank, Vec2::zeros(), 1.0));
        let counts = world.counts();
        assert_eq!(counts.enemies, 1);
        assert_eq!(counts.bosses, 1);
    }
}
