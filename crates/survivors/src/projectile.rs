//! Damage-dealing entities: projectiles, melee hitboxes and auras

use std::collections::HashSet;

use slotmap::SecondaryMap;
use survivor_engine::foundation::math::{lerp, normalize_or_zero, Vec2};
use survivor_engine::physics::{Aabb, Circle};

use crate::catalog::{WeaponKind, UNLIMITED_PIERCE};
use crate::registry::EnemyId;

/// Fraction of the way a homing bolt turns toward its target each frame
pub const HOMING_TURN: f32 = 0.1;

/// How a projectile moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Does not move after spawning
    Stationary,
    /// Constant velocity
    Linear {
        /// Velocity in units per second
        velocity: Vec2,
    },
    /// Horizontal drift with a vertical arc under gravity
    Ballistic {
        /// Horizontal speed
        horizontal: f32,
        /// Current vertical speed (negative is up)
        vertical: f32,
        /// Downward acceleration
        gravity: f32,
    },
    /// Steers toward a target enemy
    Homing {
        /// Current unit direction
        direction: Vec2,
        /// Speed
        speed: f32,
        /// Enemy being chased
        target: Option<EnemyId>,
    },
}

/// Hitbox shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Circle with radius
    Circle(f32),
    /// Axis-aligned box with full size
    Box(Vec2),
}

/// A moving or short-lived hitbox
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Weapon that produced it
    pub source: WeaponKind,
    /// World position (center)
    pub position: Vec2,
    /// Movement
    pub motion: Motion,
    /// Hitbox
    pub shape: Shape,
    /// Damage per hit
    pub damage: f32,
    /// Seconds until expiry
    pub lifetime: f32,
    /// Remaining hits; `UNLIMITED_PIERCE` never runs out
    pub pierce: u32,
    /// Each hit heals the player
    pub lifesteal: bool,
    hit: HashSet<EnemyId>,
}

impl Projectile {
    /// Create a projectile
    pub fn new(
        source: WeaponKind,
        position: Vec2,
        motion: Motion,
        shape: Shape,
        damage: f32,
        lifetime: f32,
        pierce: u32,
    ) -> Self {
        Self {
            source,
            position,
            motion,
            shape,
            damage,
            lifetime,
            pierce,
            lifesteal: false,
            hit: HashSet::new(),
        }
    }

    /// Builder: heal the player on hit
    pub fn with_lifesteal(mut self, lifesteal: bool) -> Self {
        self.lifesteal = lifesteal;
        self
    }

    /// Homing target, if any
    pub fn target(&self) -> Option<EnemyId> {
        match self.motion {
            Motion::Homing { target, .. } => target,
            _ => None,
        }
    }

    /// Whether the projectile has run out of time or hits
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0 || self.pierce == 0
    }

    /// Radius enclosing the hitbox, for broad-phase queries
    pub fn bounding_radius(&self) -> f32 {
        match self.shape {
            Shape::Circle(radius) => radius,
            Shape::Box(size) => size.norm() * 0.5,
        }
    }

    /// Narrow-phase test against an enemy collider
    pub fn overlaps(&self, enemy: &Circle) -> bool {
        match self.shape {
            Shape::Circle(radius) => Circle::new(self.position, radius).intersects(enemy),
            Shape::Box(size) => Aabb::from_center_size(self.position, size).intersects_circle(enemy),
        }
    }

    /// Move and age; `target_pos` is the homing target's current position
    pub fn update(&mut self, dt: f32, target_pos: Option<Vec2>) {
        match &mut self.motion {
            Motion::Stationary => {}
            Motion::Linear { velocity } => self.position += *velocity * dt,
            Motion::Ballistic {
                horizontal,
                vertical,
                gravity,
            } => {
                self.position.x += *horizontal * dt;
                self.position.y += *vertical * dt;
                *vertical += *gravity * dt;
            }
            Motion::Homing {
                direction,
                speed,
                target,
            } => {
                match target_pos {
                    Some(goal) if target.is_some() => {
                        let desired = normalize_or_zero(goal - self.position);
                        if desired != Vec2::zeros() {
                            *direction = normalize_or_zero(lerp(*direction, desired, HOMING_TURN));
                        }
                    }
                    // Target is gone; keep flying straight
                    _ => *target = None,
                }
                self.position += *direction * *speed * dt;
            }
        }
        self.lifetime -= dt;
    }

    /// Record a hit on `enemy`; false if it was already hit or the projectile is spent
    pub fn register_hit(&mut self, enemy: EnemyId) -> bool {
        if self.is_expired() || !self.hit.insert(enemy) {
            return false;
        }
        if self.pierce != UNLIMITED_PIERCE {
            self.pierce -= 1;
        }
        true
    }

    /// Whether `enemy` has already been hit
    pub fn has_hit(&self, enemy: EnemyId) -> bool {
        self.hit.contains(&enemy)
    }
}

/// Damage zone anchored to the player that hits each enemy on its own tick
#[derive(Debug, Clone, Default)]
pub struct Aura {
    /// Radius around the player
    pub radius: f32,
    /// Damage per tick
    pub damage: f32,
    /// Minimum seconds between hits on the same enemy
    pub interval: f32,
    /// Each hit heals the player
    pub lifesteal: bool,
    last_hit: SecondaryMap<EnemyId, f64>,
}

impl Aura {
    /// Create an aura
    pub fn new(radius: f32, damage: f32, interval: f32) -> Self {
        Self {
            radius,
            damage,
            interval,
            lifesteal: false,
            last_hit: SecondaryMap::new(),
        }
    }

    /// Collision shape centered on `anchor`
    pub fn collider(&self, anchor: Vec2) -> Circle {
        Circle::new(anchor, self.radius)
    }

    /// Try to tick `enemy` at time `now`; true if it may be damaged
    pub fn try_tick(&mut self, enemy: EnemyId, now: f64) -> bool {
        match self.last_hit.get(enemy) {
            Some(&last) if now - last < f64::from(self.interval) => false,
            _ => {
                self.last_hit.insert(enemy, now);
                true
            }
        }
    }

    /// Drop bookkeeping for enemies that no longer exist
    pub fn forget(&mut self, enemy: EnemyId) {
        self.last_hit.remove(enemy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn enemy_ids(n: usize) -> Vec<EnemyId> {
        let mut map: SlotMap<EnemyId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_pierce_and_single_hit_per_enemy() {
        let ids = enemy_ids(2);
        let mut bolt = Projectile::new(
            WeaponKind::Knife,
            Vec2::zeros(),
            Motion::Linear { velocity: Vec2::x() },
            Shape::Circle(5.0),
            8.0,
            2.0,
            1,
        );
        assert!(bolt.register_hit(ids[0]));
        assert!(bolt.is_expired());
        assert!(!bolt.register_hit(ids[1]));
    }

    #[test]
    fn test_unlimited_pierce_hits_each_enemy_once() {
        let ids = enemy_ids(3);
        let mut slash = Projectile::new(
            WeaponKind::Whip,
            Vec2::zeros(),
            Motion::Stationary,
            Shape::Box(Vec2::new(100.0, 30.0)),
            20.0,
            0.2,
            UNLIMITED_PIERCE,
        );
        for id in &ids {
            assert!(slash.register_hit(*id));
        }
        assert!(!slash.register_hit(ids[0]));
        assert!(!slash.is_expired());
    }

    #[test]
    fn test_ballistic_arc_rises_then_falls() {
        let mut axe = Projectile::new(
            WeaponKind::Axe,
            Vec2::new(0.0, 0.0),
            Motion::Ballistic {
                horizontal: 100.0,
                vertical: -300.0,
                gravity: 400.0,
            },
            Shape::Circle(12.0),
            25.0,
            3.0,
            UNLIMITED_PIERCE,
        );
        axe.update(0.5, None);
        assert!(axe.position.y < 0.0);
        for _ in 0..26 {
            axe.update(0.1, None);
        }
        assert!(axe.position.y > 0.0);
        assert_relative_eq!(axe.position.x, 310.0, epsilon = 1e-2);
        assert!(axe.is_expired());
    }

    #[test]
    fn test_homing_turns_toward_target() {
        let ids = enemy_ids(1);
        let mut bolt = Projectile::new(
            WeaponKind::MagicWand,
            Vec2::zeros(),
            Motion::Homing {
                direction: Vec2::x(),
                speed: 400.0,
                target: Some(ids[0]),
            },
            Shape::Circle(6.0),
            10.0,
            3.0,
            1,
        );
        bolt.update(0.01, Some(Vec2::new(0.0, 100.0)));
        assert!(bolt.position.y > 0.0);

        bolt.update(0.01, None);
        assert_eq!(bolt.target(), None);
    }

    #[test]
    fn test_box_overlap() {
        let slash = Projectile::new(
            WeaponKind::Whip,
            Vec2::new(90.0, 0.0),
            Motion::Stationary,
            Shape::Box(Vec2::new(100.0, 30.0)),
            20.0,
            0.2,
            UNLIMITED_PIERCE,
        );
        assert!(slash.overlaps(&Circle::new(Vec2::new(140.0, 10.0), 16.0)));
        assert!(!slash.overlaps(&Circle::new(Vec2::new(0.0, 0.0), 16.0)));
    }

    #[test]
    fn test_aura_ticks_per_enemy() {
        let ids = enemy_ids(2);
        let mut aura = Aura::new(60.0, 5.0, 0.5);
        assert!(aura.try_tick(ids[0], 0.0));
        assert!(!aura.try_tick(ids[0], 0.3));
        assert!(aura.try_tick(ids[1], 0.3));
        assert!(aura.try_tick(ids[0], 0.5));
    }
}
