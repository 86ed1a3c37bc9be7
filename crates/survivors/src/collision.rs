//! Collision and damage resolution
//!
//! Enemies are hashed into a spatial grid once per frame. Damage sources
//! query the grid for candidates and run the exact shape test on each.
//! Every kill is reported exactly once: the hit that takes an enemy to zero
//! HP drops its loot, later hits in the same frame are ignored.

use rand::Rng;
use slotmap::SlotMap;
use survivor_engine::events::EventQueue;
use survivor_engine::foundation::math::Vec2;
use survivor_engine::physics::CollisionLayers;
use survivor_engine::spatial::SpatialGrid;

use crate::catalog::GemTier;
use crate::config::DropConfig;
use crate::enemy::{DamageOutcome, Enemy};
use crate::events::GameEvent;
use crate::pickup::{Pickup, PickupKind};
use crate::player::{HitOutcome, Player};
use crate::projectile::{Motion, Projectile};
use crate::registry::{EnemyId, PickupId, World};
use crate::weapons::Arsenal;

/// HP restored per enemy hit by a lifesteal weapon
pub const LIFESTEAL_PER_HIT: f32 = 1.0;
/// Jitter applied to health drops
pub const HEALTH_DROP_SPREAD: f32 = 10.0;
/// Jitter applied to chest drops
pub const CHEST_DROP_SPREAD: f32 = 15.0;

const ENEMY_MASK: CollisionLayers = CollisionLayers::PLAYER
    .union(CollisionLayers::PROJECTILE)
    .union(CollisionLayers::AURA);
const PLAYER_MASK: CollisionLayers = CollisionLayers::ENEMY.union(CollisionLayers::PICKUP);
const WEAPON_MASK: CollisionLayers = CollisionLayers::ENEMY;

/// Tallies from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    /// Enemies killed
    pub kills: u32,
    /// HP removed from enemies
    pub damage_dealt: f32,
    /// HP the player lost
    pub damage_taken: f32,
    /// The player died this pass
    pub player_died: bool,
}

/// Broad-phase grid plus the damage rules
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    grid: SpatialGrid<EnemyId>,
}

struct Loot<'a, R> {
    pickups: &'a mut SlotMap<PickupId, Pickup>,
    drops: &'a DropConfig,
    rng: &'a mut R,
    events: &'a mut EventQueue<GameEvent>,
}

impl CollisionSystem {
    /// Create with the given grid cell size
    pub fn new(cell_size: f32) -> Self {
        Self {
            grid: SpatialGrid::new(cell_size),
        }
    }

    /// Layer a projectile occupies; slashes count as melee zones
    pub fn projectile_layer(projectile: &Projectile) -> CollisionLayers {
        match projectile.motion {
            Motion::Stationary => CollisionLayers::AURA,
            _ => CollisionLayers::PROJECTILE,
        }
    }

    /// Hash every living enemy into the grid
    pub fn rebuild(&mut self, world: &World) {
        self.grid.clear();
        for (id, enemy) in world.enemies.iter().filter(|(_, e)| !e.is_dead()) {
            self.grid.insert(id, enemy.position, enemy.radius);
        }
    }

    /// Closest living enemy center to `point` as of the last `rebuild`
    pub fn nearest_enemy(&self, point: Vec2) -> Option<(EnemyId, Vec2)> {
        self.grid.nearest(point).map(|entry| (entry.key, entry.position))
    }

    /// Resolve every overlap for this frame
    ///
    /// Expects `rebuild` after this frame's movement. `now` is run time and
    /// drives aura ticks.
    pub fn resolve(
        &mut self,
        world: &mut World,
        arsenal: &mut Arsenal,
        drops: &DropConfig,
        now: f64,
        rng: &mut impl Rng,
        events: &mut EventQueue<GameEvent>,
    ) -> CollisionReport {
        let World {
            player,
            enemies,
            projectiles,
            pickups,
            ..
        } = world;
        let mut report = CollisionReport::default();
        let mut loot = Loot {
            pickups,
            drops,
            rng,
            events,
        };

        for projectile in projectiles.values_mut() {
            let layer = Self::projectile_layer(projectile);
            if projectile.is_expired()
                || !CollisionLayers::should_collide(layer, WEAPON_MASK, CollisionLayers::ENEMY, ENEMY_MASK)
            {
                continue;
            }

            for entry in self.grid.query_radius(projectile.position, projectile.bounding_radius()) {
                if projectile.is_expired() {
                    break;
                }
                let Some(enemy) = enemies.get_mut(entry.key) else {
                    continue;
                };
                if enemy.is_dead() || projectile.has_hit(entry.key) || !projectile.overlaps(&enemy.collider()) {
                    continue;
                }

                projectile.register_hit(entry.key);
                let push = enemy.position - projectile.position;
                let outcome = enemy.take_damage(projectile.damage, push);
                Self::credit(outcome, enemy, projectile.lifesteal, player, &mut loot, &mut report);
            }
        }

        let anchor = player.position;
        for weapon in arsenal.weapons_mut() {
            let Some(aura) = weapon.aura_mut() else {
                continue;
            };
            let zone = aura.collider(anchor);
            for entry in self.grid.query_radius(anchor, aura.radius) {
                let Some(enemy) = enemies.get_mut(entry.key) else {
                    continue;
                };
                if enemy.is_dead() || !zone.intersects(&enemy.collider()) || !aura.try_tick(entry.key, now) {
                    continue;
                }
                let outcome = enemy.take_damage(aura.damage, enemy.position - anchor);
                Self::credit(outcome, enemy, aura.lifesteal, player, &mut loot, &mut report);
            }
        }

        if CollisionLayers::should_collide(CollisionLayers::PLAYER, PLAYER_MASK, CollisionLayers::ENEMY, ENEMY_MASK) {
            for entry in self.grid.query_radius(player.position, player.radius) {
                let Some(enemy) = enemies.get_mut(entry.key) else {
                    continue;
                };
                if !enemy.can_contact() || !player.collider().intersects(&enemy.collider()) {
                    continue;
                }
                match player.take_hit(enemy.damage) {
                    HitOutcome::Ignored => {}
                    HitOutcome::Damaged(amount) | HitOutcome::Killed(amount) => {
                        enemy.reset_contact_cooldown();
                        report.damage_taken += amount;
                        loot.events.send(GameEvent::PlayerHit {
                            damage: amount,
                            hp: player.hp,
                        });
                        if player.is_dead() {
                            report.player_died = true;
                            break;
                        }
                    }
                }
            }
        }

        report
    }

    fn credit<R: Rng>(
        outcome: DamageOutcome,
        enemy: &Enemy,
        lifesteal: bool,
        player: &mut Player,
        loot: &mut Loot<'_, R>,
        report: &mut CollisionReport,
    ) {
        if outcome == DamageOutcome::Ignored {
            return;
        }
        player.damage_dealt += outcome.dealt();
        report.damage_dealt += outcome.dealt();
        if lifesteal {
            player.heal(LIFESTEAL_PER_HIT);
        }

        if let DamageOutcome::Killed(_) = outcome {
            player.kills += 1;
            report.kills += 1;
            drop_loot(enemy, loot);
            loot.events.send(GameEvent::EnemyKilled {
                kind: enemy.kind,
                position: enemy.position,
            });
        }
    }

    /// Drop aura bookkeeping for enemies removed from the world
    pub fn forget(arsenal: &mut Arsenal, removed: &[EnemyId]) {
        for weapon in arsenal.weapons_mut() {
            if let Some(aura) = weapon.aura_mut() {
                for id in removed {
                    aura.forget(*id);
                }
            }
        }
    }
}

fn drop_loot<R: Rng>(enemy: &Enemy, loot: &mut Loot<'_, R>) {
    for tier in GemTier::split(enemy.xp_value) {
        loot.pickups.insert(Pickup::new(PickupKind::Gem(tier), enemy.position));
    }

    if loot.rng.gen::<f64>() < loot.drops.health_chance {
        let at = jitter(enemy.position, HEALTH_DROP_SPREAD, &mut *loot.rng);
        loot.pickups.insert(Pickup::new(PickupKind::Health, at));
    }
    if loot.rng.gen::<f64>() < loot.drops.chest_chance {
        let at = jitter(enemy.position, CHEST_DROP_SPREAD, &mut *loot.rng);
        log::debug!("{} dropped a chest", enemy.kind.name());
        loot.pickups.insert(Pickup::new(PickupKind::Chest, at));
    }
}

fn jitter(at: Vec2, spread: f32, rng: &mut impl Rng) -> Vec2 {
    at + Vec2::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnemyKind, WeaponKind, UNLIMITED_PIERCE};
    use crate::config::GameConfig;
    use crate::projectile::Shape;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        world: World,
        arsenal: Arsenal,
        system: CollisionSystem,
        drops: DropConfig,
        rng: StdRng,
        events: EventQueue<GameEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = GameConfig::default();
            Self {
                world: World::new(&config),
                arsenal: Arsenal::new(),
                system: CollisionSystem::new(config.world.grid_cell_size),
                drops: DropConfig {
                    health_chance: 0.0,
                    chest_chance: 0.0,
                    ..DropConfig::default()
                },
                rng: StdRng::seed_from_u64(17),
                events: EventQueue::new(),
            }
        }

        fn resolve(&mut self, now: f64) -> CollisionReport {
            self.system.rebuild(&self.world);
            self.system.resolve(
                &mut self.world,
                &mut self.arsenal,
                &self.drops,
                now,
                &mut self.rng,
                &mut self.events,
            )
        }

        fn enemy_at(&mut self, kind: EnemyKind, offset: Vec2) -> EnemyId {
            let at = self.world.player.position + offset;
            self.world.spawn_enemy(Enemy::spawn(kind, at, 1.0))
        }

        fn bolt(&mut self, offset: Vec2, damage: f32, pierce: u32) {
            let at = self.world.player.position + offset;
            self.world.spawn_projectile(Projectile::new(
                WeaponKind::Knife,
                at,
                Motion::Linear { velocity: Vec2::x() },
                Shape::Circle(5.0),
                damage,
                2.0,
                pierce,
            ));
        }
    }

    #[test]
    fn test_kill_reported_once_and_drops_gems() {
        let mut f = Fixture::new();
        let tank = f.enemy_at(EnemyKind::Tank, Vec2::new(300.0, 0.0));
        f.bolt(Vec2::new(300.0, 0.0), 40.0, 1);
        f.bolt(Vec2::new(300.0, 0.0), 40.0, 1);
        f.bolt(Vec2::new(300.0, 0.0), 40.0, 1);

        let report = f.resolve(0.0);
        assert_eq!(report.kills, 1);
        assert_eq!(f.world.player.kills, 1);
        assert_relative_eq!(f.world.enemies[tank].hp, 0.0);
        assert_relative_eq!(report.damage_dealt, 50.0);

        // Tank is worth 5 XP: one medium gem
        assert_eq!(f.world.pickups.len(), 1);
        let kills = f
            .events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn test_pierce_limits_hits() {
        let mut f = Fixture::new();
        let a = f.enemy_at(EnemyKind::Tank, Vec2::new(300.0, 0.0));
        let b = f.enemy_at(EnemyKind::Tank, Vec2::new(305.0, 0.0));
        f.bolt(Vec2::new(302.0, 0.0), 10.0, 1);

        f.resolve(0.0);
        let wounded = [a, b]
            .iter()
            .filter(|id| f.world.enemies[**id].hp < f.world.enemies[**id].max_hp)
            .count();
        assert_eq!(wounded, 1);
        assert!(f.world.projectiles.values().all(Projectile::is_expired));
    }

    #[test]
    fn test_slash_hits_each_enemy_once() {
        let mut f = Fixture::new();
        let id = f.enemy_at(EnemyKind::Tank, Vec2::new(300.0, 0.0));
        let at = f.world.player.position + Vec2::new(300.0, 0.0);
        f.world.spawn_projectile(Projectile::new(
            WeaponKind::Whip,
            at,
            Motion::Stationary,
            Shape::Box(Vec2::new(100.0, 30.0)),
            20.0,
            0.2,
            UNLIMITED_PIERCE,
        ));
        f.resolve(0.0);
        f.resolve(0.016);
        assert_relative_eq!(f.world.enemies[id].hp, 30.0);
        assert!(f.world.enemies[id].is_knocked_back());
    }

    #[test]
    fn test_aura_ticks_on_interval_with_lifesteal() {
        let mut f = Fixture::new();
        let stats = f.world.player.stats.clone();
        f.arsenal.add_weapon(WeaponKind::Garlic, &stats).unwrap();
        if let Some(aura) = f.arsenal.weapons_mut()[0].aura_mut() {
            aura.lifesteal = true;
        }
        let id = f.enemy_at(EnemyKind::Tank, Vec2::new(40.0, 0.0));
        f.world.player.hp = 50.0;
        // Keep the tank from touching back
        f.world.enemies[id].reset_contact_cooldown();

        f.resolve(0.0);
        f.resolve(0.2);
        assert_relative_eq!(f.world.enemies[id].hp, 45.0);
        f.resolve(0.5);
        assert_relative_eq!(f.world.enemies[id].hp, 40.0);
        assert_relative_eq!(f.world.player.hp, 52.0);
    }

    #[test]
    fn test_simultaneous_contacts_hit_once() {
        let mut f = Fixture::new();
        for dx in [-10.0, 0.0, 10.0] {
            f.enemy_at(EnemyKind::Chaser, Vec2::new(dx, 5.0));
        }
        let report = f.resolve(0.0);
        assert_relative_eq!(report.damage_taken, 10.0);
        assert_relative_eq!(f.world.player.hp, 90.0);
        assert!(f.world.player.is_invincible());
    }

    #[test]
    fn test_fatal_contact_reports_death() {
        let mut f = Fixture::new();
        f.world.player.hp = 5.0;
        f.enemy_at(EnemyKind::Boss, Vec2::new(10.0, 0.0));
        let report = f.resolve(0.0);
        assert!(report.player_died);
        assert_relative_eq!(f.world.player.hp, 0.0);
    }

    #[test]
    fn test_certain_drops() {
        let mut f = Fixture::new();
        f.drops.health_chance = 1.0;
        f.drops.chest_chance = 1.0;
        f.enemy_at(EnemyKind::Bat, Vec2::new(300.0, 0.0));
        f.bolt(Vec2::new(300.0, 0.0), 100.0, 1);
        f.resolve(0.0);

        let kinds: Vec<PickupKind> = f.world.pickups.values().map(|p| p.kind).collect();
        assert!(kinds.contains(&PickupKind::Health));
        assert!(kinds.contains(&PickupKind::Chest));
        // Bat is worth 2 XP: two small gems
        assert_eq!(kinds.iter().filter(|k| matches!(k, PickupKind::Gem(_))).count(), 2);
    }

    #[test]
    fn test_forget_clears_aura_history() {
        let mut f = Fixture::new();
        let stats = f.world.player.stats.clone();
        f.arsenal.add_weapon(WeaponKind::Garlic, &stats).unwrap();
        let id = f.enemy_at(EnemyKind::Tank, Vec2::new(40.0, 0.0));
        f.world.enemies[id].reset_contact_cooldown();
        f.resolve(0.0);

        CollisionSystem::forget(&mut f.arsenal, &[id]);
        let aura = f.arsenal.weapons_mut()[0].aura_mut().unwrap();
        assert!(aura.try_tick(id, 0.1));
    }

    #[test]
    fn test_nearest_enemy_skips_dead() {
        let mut f = Fixture::new();
        let near = f.enemy_at(EnemyKind::Bat, Vec2::new(40.0, 0.0));
        let far = f.enemy_at(EnemyKind::Bat, Vec2::new(0.0, -400.0));
        let anchor = f.world.player.position;

        f.system.rebuild(&f.world);
        assert_eq!(f.system.nearest_enemy(anchor).map(|(id, _)| id), Some(near));

        f.world.enemies[near].take_damage(1000.0, Vec2::zeros());
        f.system.rebuild(&f.world);
        let (id, at) = f.system.nearest_enemy(anchor).unwrap();
        assert_eq!(id, far);
        assert_relative_eq!(at.y, anchor.y - 400.0);
    }
}
