//! Collectible drops

use survivor_engine::foundation::math::{normalize_or_zero, Vec2};

use crate::catalog::GemTier;
use crate::config::DropConfig;

/// What a pickup gives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    /// Experience gem
    Gem(GemTier),
    /// Restores HP
    Health,
    /// Grants an upgrade choice
    Chest,
}

impl PickupKind {
    /// Whether the pickup is pulled in by the pickup radius
    pub fn is_magnetic(self) -> bool {
        !matches!(self, PickupKind::Chest)
    }
}

/// A pickup lying in the world
#[derive(Debug, Clone)]
pub struct Pickup {
    /// Pickup kind
    pub kind: PickupKind,
    /// World position
    pub position: Vec2,
    /// Drawn size; chests use it as their touch radius
    pub size: f32,
    /// Once set, the pickup homes on the player until collected
    pub magnetized: bool,
}

impl Pickup {
    /// Create a pickup
    pub fn new(kind: PickupKind, position: Vec2) -> Self {
        let size = match kind {
            PickupKind::Gem(GemTier::Small) => 6.0,
            PickupKind::Gem(GemTier::Medium) => 8.0,
            PickupKind::Gem(GemTier::Large) => 10.0,
            PickupKind::Health => 10.0,
            PickupKind::Chest => 16.0,
        };
        Self {
            kind,
            position,
            size,
            magnetized: false,
        }
    }

    /// Advance toward the player; returns true once collected
    ///
    /// Magnetic pickups latch on inside the pickup radius and accelerate as
    /// they close in. Chests stay put and are collected on touch.
    pub fn update(&mut self, dt: f32, player_pos: Vec2, pickup_radius: f32, config: &DropConfig) -> bool {
        let to_player = player_pos - self.position;
        let distance = to_player.norm();

        if !self.kind.is_magnetic() {
            return distance <= self.size + config.chest_reach;
        }

        if distance <= pickup_radius {
            self.magnetized = true;
        }
        if !self.magnetized {
            return false;
        }
        if distance <= config.collect_distance {
            return true;
        }

        let radius = pickup_radius.max(f32::EPSILON);
        // A magnetized pickup outside the radius moves at base speed
        let speed = config.magnet_speed * (1.0 + ((radius - distance) / radius).max(0.0));
        let step = (speed * dt).min(distance);
        self.position += normalize_or_zero(to_player) * step;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gem_outside_radius_stays_put() {
        let config = DropConfig::default();
        let mut gem = Pickup::new(PickupKind::Gem(GemTier::Small), Vec2::new(200.0, 0.0));
        assert!(!gem.update(0.016, Vec2::zeros(), 80.0, &config));
        assert_eq!(gem.position, Vec2::new(200.0, 0.0));
        assert!(!gem.magnetized);
    }

    #[test]
    fn test_magnetized_gem_is_collected() {
        let config = DropConfig::default();
        let mut gem = Pickup::new(PickupKind::Gem(GemTier::Medium), Vec2::new(70.0, 0.0));
        let mut collected = false;
        for _ in 0..60 {
            if gem.update(1.0 / 60.0, Vec2::zeros(), 80.0, &config) {
                collected = true;
                break;
            }
        }
        assert!(gem.magnetized);
        assert!(collected);
    }

    #[test]
    fn test_magnetized_gem_follows_beyond_radius() {
        let config = DropConfig::default();
        let mut gem = Pickup::new(PickupKind::Health, Vec2::new(50.0, 0.0));
        gem.update(0.001, Vec2::zeros(), 80.0, &config);
        assert!(gem.magnetized);
        let before = gem.position.x;
        gem.update(0.01, Vec2::new(-300.0, 0.0), 80.0, &config);
        assert!(gem.position.x < before);
    }

    #[test]
    fn test_chest_needs_touch() {
        let config = DropConfig::default();
        let mut chest = Pickup::new(PickupKind::Chest, Vec2::new(40.0, 0.0));
        assert!(!chest.update(0.1, Vec2::zeros(), 500.0, &config));
        assert_eq!(chest.position, Vec2::new(40.0, 0.0));
        assert!(chest.update(0.1, Vec2::new(15.0, 0.0), 500.0, &config));
    }
}
