//! Player state

use survivor_engine::foundation::math::{Bounds2, Vec2};
use survivor_engine::physics::Circle;

use crate::config::{GameConfig, PlayerConfig};
use crate::progression::Experience;
use crate::stats::StatBlock;

/// Result of the player being hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Hit was absorbed by i-frames, cheats or death
    Ignored,
    /// HP was lost; carries the amount
    Damaged(f32),
    /// This hit was fatal; carries the amount
    Killed(f32),
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// World position
    pub position: Vec2,
    /// Unit vector of the last movement direction
    pub facing: Vec2,
    /// Current stats including passives
    pub stats: StatBlock,
    /// Current HP
    pub hp: f32,
    /// Collision radius
    pub radius: f32,
    /// Level and experience
    pub experience: Experience,
    /// Enemies killed this run
    pub kills: u32,
    /// HP removed from enemies this run
    pub damage_dealt: f32,
    /// HP lost this run
    pub damage_taken: f32,
    invincibility_duration: f32,
    invincibility_timer: f32,
    regen_timer: f32,
    unlimited_health: bool,
}

impl Player {
    /// Create a player at `position` from config
    pub fn new(position: Vec2, config: &GameConfig) -> Self {
        let PlayerConfig {
            stats,
            radius,
            invincibility,
            ..
        } = &config.player;
        Self {
            position,
            facing: Vec2::x(),
            stats: stats.clone(),
            hp: stats.max_hp,
            radius: *radius,
            experience: Experience::new(&config.progression),
            kills: 0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            invincibility_duration: *invincibility,
            invincibility_timer: 0.0,
            regen_timer: 0.0,
            unlimited_health: config.cheats.unlimited_health,
        }
    }

    /// Collision shape
    pub fn collider(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Whether HP has reached zero
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Whether the i-frame window is active
    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }

    /// HP as a fraction of max HP
    pub fn hp_fraction(&self) -> f32 {
        if self.stats.max_hp > 0.0 {
            (self.hp / self.stats.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Move along a unit `direction`; idle input keeps the old facing
    pub fn steer(&mut self, direction: Vec2, dt: f32, bounds: &Bounds2) {
        if direction != Vec2::zeros() {
            self.facing = direction;
        }
        let next = self.position + direction * self.stats.move_speed * dt;
        self.position = bounds.inset(self.radius).clamp(next);
    }

    /// Take a hit of `damage` before armor
    pub fn take_hit(&mut self, damage: f32) -> HitOutcome {
        if self.is_invincible() || self.is_dead() {
            return HitOutcome::Ignored;
        }

        self.invincibility_timer = self.invincibility_duration;
        if self.unlimited_health {
            return HitOutcome::Ignored;
        }

        let amount = self.stats.mitigate(damage);
        self.hp = (self.hp - amount).max(0.0);
        self.damage_taken += amount;

        if self.is_dead() {
            HitOutcome::Killed(amount)
        } else {
            HitOutcome::Damaged(amount)
        }
    }

    /// Restore HP up to max
    pub fn heal(&mut self, amount: f32) {
        if !self.is_dead() {
            self.hp = (self.hp + amount).min(self.stats.max_hp);
        }
    }

    /// Count down i-frames and apply regeneration once per full second
    pub fn tick(&mut self, dt: f32) {
        if self.invincibility_timer > 0.0 {
            self.invincibility_timer = (self.invincibility_timer - dt).max(0.0);
        }

        if self.stats.regen > 0.0 && self.hp < self.stats.max_hp {
            self.regen_timer += dt;
            if self.regen_timer >= 1.0 {
                self.regen_timer = 0.0;
                self.heal(self.stats.regen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn player() -> Player {
        Player::new(Vec2::new(1000.0, 1000.0), &GameConfig::default())
    }

    #[test]
    fn test_invincibility_blocks_second_hit() {
        let mut p = player();
        assert_eq!(p.take_hit(10.0), HitOutcome::Damaged(10.0));
        assert_eq!(p.take_hit(10.0), HitOutcome::Ignored);
        assert_relative_eq!(p.hp, 90.0);

        p.tick(0.49);
        assert_eq!(p.take_hit(10.0), HitOutcome::Ignored);
        p.tick(0.01);
        assert_eq!(p.take_hit(10.0), HitOutcome::Damaged(10.0));
        assert_relative_eq!(p.damage_taken, 20.0);
    }

    #[test]
    fn test_fatal_hit_clamps_hp() {
        let mut p = player();
        p.hp = 5.0;
        assert_eq!(p.take_hit(30.0), HitOutcome::Killed(30.0));
        assert_relative_eq!(p.hp, 0.0);
        assert!(p.is_dead());
        p.heal(50.0);
        assert_relative_eq!(p.hp, 0.0);
    }

    #[test]
    fn test_unlimited_health_still_grants_iframes() {
        let mut config = GameConfig::default();
        config.cheats.unlimited_health = true;
        let mut p = Player::new(Vec2::zeros(), &config);
        assert_eq!(p.take_hit(1000.0), HitOutcome::Ignored);
        assert!(p.is_invincible());
        assert_relative_eq!(p.hp, 100.0);
    }

    #[test]
    fn test_regen_ticks_once_per_second() {
        let mut p = player();
        p.stats.regen = 2.0;
        p.hp = 50.0;
        p.tick(0.6);
        assert_relative_eq!(p.hp, 50.0);
        p.tick(0.4);
        assert_relative_eq!(p.hp, 52.0);
    }

    #[test]
    fn test_steer_updates_facing_and_clamps() {
        let mut p = player();
        let bounds = Bounds2::from_size(2000.0, 2000.0);
        p.steer(Vec2::new(-1.0, 0.0), 100.0, &bounds);
        assert_relative_eq!(p.position.x, 24.0);
        assert_eq!(p.facing, Vec2::new(-1.0, 0.0));

        p.steer(Vec2::zeros(), 1.0, &bounds);
        assert_eq!(p.facing, Vec2::new(-1.0, 0.0));
    }
}
