//! Enemy state and movement

use survivor_engine::foundation::math::{normalize_or_zero, Bounds2, Vec2};
use survivor_engine::physics::Circle;

use crate::catalog::{Behavior, EnemyKind};

/// Knockback speed applied on hit
pub const KNOCKBACK_SPEED: f32 = 200.0;
/// Knockback duration (seconds)
pub const KNOCKBACK_DURATION: f32 = 0.1;
/// Seconds between contact hits from the same enemy
pub const CONTACT_COOLDOWN: f32 = 0.5;
/// Seconds between zigzag flips
pub const ZIGZAG_PERIOD: f32 = 0.3;
/// Sideways drift relative to forward motion while zigzagging
pub const ZIGZAG_DRIFT: f32 = 0.5;

const PHASE_RATE: f32 = 200.0 / 255.0;
const PHASE_MIN: f32 = 100.0 / 255.0;

/// Result of damaging an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Enemy was already dead; nothing happened
    Ignored,
    /// Enemy survived; carries the HP removed
    Wounded(f32),
    /// This hit killed the enemy; carries the HP removed
    Killed(f32),
}

impl DamageOutcome {
    /// HP removed by the hit
    pub fn dealt(self) -> f32 {
        match self {
            DamageOutcome::Ignored => 0.0,
            DamageOutcome::Wounded(amount) | DamageOutcome::Killed(amount) => amount,
        }
    }
}

/// A live enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Enemy kind
    pub kind: EnemyKind,
    /// World position
    pub position: Vec2,
    /// Current HP, never negative
    pub hp: f32,
    /// HP at spawn
    pub max_hp: f32,
    /// Contact damage
    pub damage: f32,
    /// Movement speed
    pub speed: f32,
    /// Experience paid out on death
    pub xp_value: u32,
    /// Collision radius
    pub radius: f32,
    /// Opacity in `[0.4, 1.0]`; only ghosts pulse
    pub opacity: f32,
    heading: Vec2,
    knockback: Vec2,
    knockback_timer: f32,
    contact_cooldown: f32,
    zigzag_timer: f32,
    zigzag_sign: f32,
    phase_sign: f32,
}

impl Enemy {
    /// Create an enemy with difficulty scaling applied
    ///
    /// HP scales with the multiplier, contact damage with half of its excess.
    pub fn spawn(kind: EnemyKind, position: Vec2, difficulty: f32) -> Self {
        let base = kind.base();
        let max_hp = (base.hp * difficulty).floor().max(1.0);
        Self {
            kind,
            position,
            hp: max_hp,
            max_hp,
            damage: (base.damage * (1.0 + (difficulty - 1.0) * 0.5)).floor(),
            speed: base.speed,
            xp_value: base.xp_value,
            radius: base.radius,
            opacity: 1.0,
            heading: Vec2::zeros(),
            knockback: Vec2::zeros(),
            knockback_timer: 0.0,
            contact_cooldown: 0.0,
            zigzag_timer: 0.0,
            zigzag_sign: 1.0,
            phase_sign: -1.0,
        }
    }

    /// Whether HP has reached zero
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Collision shape
    pub fn collider(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Current movement direction
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    /// Whether the enemy is being pushed back
    pub fn is_knocked_back(&self) -> bool {
        self.knockback_timer > 0.0
    }

    /// Move toward `target` and advance timers
    pub fn update(&mut self, dt: f32, target: Vec2, bounds: &Bounds2) {
        let to_target = normalize_or_zero(target - self.position);
        if to_target != Vec2::zeros() {
            self.heading = to_target;
        }

        match self.kind.base().behavior {
            Behavior::Chase => {}
            Behavior::Zigzag => {
                self.zigzag_timer += dt;
                if self.zigzag_timer >= ZIGZAG_PERIOD {
                    self.zigzag_timer = 0.0;
                    self.zigzag_sign = -self.zigzag_sign;
                }
                let perpendicular = Vec2::new(-self.heading.y, self.heading.x);
                self.heading =
                    normalize_or_zero(self.heading + perpendicular * ZIGZAG_DRIFT * self.zigzag_sign);
            }
            Behavior::Phase => {
                self.opacity += self.phase_sign * PHASE_RATE * dt;
                if self.opacity <= PHASE_MIN {
                    self.opacity = PHASE_MIN;
                    self.phase_sign = 1.0;
                } else if self.opacity >= 1.0 {
                    self.opacity = 1.0;
                    self.phase_sign = -1.0;
                }
            }
        }

        let movement = if self.knockback_timer > 0.0 {
            self.knockback_timer -= dt;
            self.knockback * dt
        } else {
            self.knockback = Vec2::zeros();
            self.heading * self.speed * dt
        };
        self.position = bounds.inset(self.radius).clamp(self.position + movement);

        if self.contact_cooldown > 0.0 {
            self.contact_cooldown -= dt;
        }
    }

    /// Apply damage, clamping HP at zero
    ///
    /// A kill is reported only by the hit that crosses zero.
    pub fn take_damage(&mut self, amount: f32, knockback_dir: Vec2) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }

        let dealt = amount.min(self.hp).max(0.0);
        self.hp = (self.hp - amount).max(0.0);

        let push = normalize_or_zero(knockback_dir);
        if push != Vec2::zeros() {
            self.knockback = push * KNOCKBACK_SPEED;
            self.knockback_timer = KNOCKBACK_DURATION;
        }

        if self.is_dead() {
            DamageOutcome::Killed(dealt)
        } else {
            DamageOutcome::Wounded(dealt)
        }
    }

    /// Whether the contact cooldown has elapsed
    pub fn can_contact(&self) -> bool {
        self.contact_cooldown <= 0.0 && !self.is_dead()
    }

    /// Start the contact cooldown after hurting the player
    pub fn reset_contact_cooldown(&mut self) {
        self.contact_cooldown = CONTACT_COOLDOWN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn world() -> Bounds2 {
        Bounds2::from_size(2000.0, 2000.0)
    }

    #[test]
    fn test_difficulty_scaling() {
        let tank = Enemy::spawn(EnemyKind::Tank, Vec2::zeros(), 2.0);
        assert_relative_eq!(tank.max_hp, 100.0);
        assert_relative_eq!(tank.damage, 30.0);

        let chaser = Enemy::spawn(EnemyKind::Chaser, Vec2::zeros(), 1.0);
        assert_relative_eq!(chaser.hp, 10.0);
        assert_relative_eq!(chaser.damage, 10.0);
    }

    #[test]
    fn test_hp_clamped_and_kill_reported_once() {
        let mut enemy = Enemy::spawn(EnemyKind::Chaser, Vec2::new(100.0, 100.0), 1.0);
        assert_eq!(enemy.take_damage(4.0, Vec2::x()), DamageOutcome::Wounded(4.0));
        assert_eq!(enemy.take_damage(50.0, Vec2::x()), DamageOutcome::Killed(6.0));
        assert_relative_eq!(enemy.hp, 0.0);
        assert_eq!(enemy.take_damage(50.0, Vec2::x()), DamageOutcome::Ignored);
        assert_relative_eq!(enemy.hp, 0.0);
    }

    #[test]
    fn test_chaser_moves_toward_target() {
        let mut enemy = Enemy::spawn(EnemyKind::Chaser, Vec2::new(100.0, 100.0), 1.0);
        enemy.update(0.5, Vec2::new(500.0, 100.0), &world());
        assert_relative_eq!(enemy.position, Vec2::new(140.0, 100.0), epsilon = 1e-4);
    }

    #[test]
    fn test_knockback_overrides_chase() {
        let mut enemy = Enemy::spawn(EnemyKind::Tank, Vec2::new(500.0, 500.0), 1.0);
        enemy.take_damage(1.0, Vec2::new(-1.0, 0.0));
        assert!(enemy.is_knocked_back());
        enemy.update(0.05, Vec2::new(1000.0, 500.0), &world());
        assert!(enemy.position.x < 500.0);
    }

    #[test]
    fn test_bat_zigzags_off_axis() {
        let mut bat = Enemy::spawn(EnemyKind::Bat, Vec2::new(100.0, 1000.0), 1.0);
        bat.update(0.1, Vec2::new(1000.0, 1000.0), &world());
        assert!(bat.heading().y.abs() > 0.1);
        let first_side = bat.heading().y.signum();

        bat.update(0.3, Vec2::new(1000.0, 1000.0), &world());
        assert_relative_eq!(bat.heading().y.signum(), -first_side);
    }

    #[test]
    fn test_ghost_opacity_pulses() {
        let mut ghost = Enemy::spawn(EnemyKind::Ghost, Vec2::new(100.0, 100.0), 1.0);
        for _ in 0..20 {
            ghost.update(0.1, Vec2::new(900.0, 900.0), &world());
            assert!(ghost.opacity >= PHASE_MIN && ghost.opacity <= 1.0);
        }
    }

    #[test]
    fn test_contact_cooldown() {
        let mut enemy = Enemy::spawn(EnemyKind::Chaser, Vec2::new(100.0, 100.0), 1.0);
        assert!(enemy.can_contact());
        enemy.reset_contact_cooldown();
        assert!(!enemy.can_contact());
        enemy.update(0.5, Vec2::new(100.0, 100.0), &world());
        assert!(enemy.can_contact());
    }

    #[test]
    fn test_position_stays_in_world() {
        let mut enemy = Enemy::spawn(EnemyKind::Swarm, Vec2::new(15.0, 15.0), 1.0);
        enemy.update(0.1, Vec2::new(-500.0, -500.0), &world());
        assert!(enemy.position.x >= enemy.radius && enemy.position.y >= enemy.radius);
    }
}
