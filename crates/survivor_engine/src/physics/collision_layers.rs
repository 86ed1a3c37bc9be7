//! Collision layer system for filtering collision detection
//!
//! Each body carries a layer (what it is) and a mask (what it reacts to).
//! Two bodies interact only when each one's layer is in the other's mask.

use bitflags::bitflags;

bitflags! {
    /// Collision layer definitions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles fired by the player
        const PROJECTILE = 1 << 2;
        /// Damage zones attached to the player (auras, slashes)
        const AURA = 1 << 3;
        /// Pickups and collectibles
        const PICKUP = 1 << 4;
    }
}

impl CollisionLayers {
    /// Check if two bodies should collide based on their layers and masks
    ///
    /// ```
    /// use survivor_engine::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::PICKUP;
    /// let enemy_mask = CollisionLayers::PLAYER | CollisionLayers::PROJECTILE;
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::ENEMY, enemy_mask,
    /// ));
    /// ```
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        mask_b.intersects(layer_a) && mask_a.intersects(layer_b)
    }
}
