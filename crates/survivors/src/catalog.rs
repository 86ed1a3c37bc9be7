//! Static per-kind data tables
//!
//! Weapons, passives, enemies and gem tiers are closed enumerations. Their
//! numbers live here so every other module asks the kind instead of carrying
//! its own copy.

use serde::{Deserialize, Serialize};

use crate::stats::{Modifier, Stat, StatModifier};

/// Maximum number of distinct weapons carried at once
pub const MAX_WEAPONS: usize = 6;

/// Maximum number of distinct passives carried at once
pub const MAX_PASSIVES: usize = 6;

/// Highest weapon level
pub const MAX_WEAPON_LEVEL: u32 = 8;

/// Highest passive level
pub const MAX_PASSIVE_LEVEL: u32 = 5;

/// Pierce value treated as unlimited
pub const UNLIMITED_PIERCE: u32 = 999;

/// Weapon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Horizontal slash on the facing side
    Whip,
    /// Bolt fired at the nearest enemy
    MagicWand,
    /// Damage aura around the player
    Garlic,
    /// Arcing thrown axe
    Axe,
    /// Fast knives in the facing direction
    Knife,
}

/// Level-1 weapon numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponBase {
    /// Damage per hit
    pub damage: f32,
    /// Seconds between attacks
    pub cooldown: f32,
    /// Area multiplier
    pub area: f32,
    /// Projectile speed
    pub speed: f32,
    /// Projectiles per attack
    pub amount: u32,
    /// Enemies hit before the projectile is spent
    pub pierce: u32,
}

/// Per-level weapon growth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponScaling {
    /// Damage added per level
    pub damage: f32,
    /// Cooldown added per level (negative)
    pub cooldown: f32,
    /// Area added per level
    pub area: f32,
    /// Projectiles added every second level
    pub amount: u32,
}

/// Evolved form of a weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evolution {
    /// Display name
    pub name: &'static str,
    /// Passive that must be owned
    pub requires: PassiveKind,
    /// Damage multiplier applied on top of the level table
    pub damage_multiplier: f32,
    /// Behavior unlocked by evolving
    pub effect: EvolutionEffect,
}

/// Behavior unlocked by an evolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionEffect {
    /// Each enemy hit heals the player
    Lifesteal,
    /// Bolts steer toward their target every frame
    Homing,
}

impl WeaponKind {
    /// Every weapon in offer order
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Whip,
        WeaponKind::MagicWand,
        WeaponKind::Garlic,
        WeaponKind::Axe,
        WeaponKind::Knife,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Whip => "Whip",
            WeaponKind::MagicWand => "Magic Wand",
            WeaponKind::Garlic => "Garlic",
            WeaponKind::Axe => "Axe",
            WeaponKind::Knife => "Knife",
        }
    }

    /// Card description
    pub fn description(self) -> &'static str {
        match self {
            WeaponKind::Whip => "Horizontal slash in facing direction",
            WeaponKind::MagicWand => "Fires projectile at nearest enemy",
            WeaponKind::Garlic => "Damages nearby enemies",
            WeaponKind::Axe => "Thrown in high arc, passes through enemies",
            WeaponKind::Knife => "Throws knives in facing direction",
        }
    }

    /// Level-1 numbers
    pub fn base(self) -> WeaponBase {
        match self {
            WeaponKind::Whip => WeaponBase {
                damage: 20.0,
                cooldown: 1.5,
                area: 1.0,
                speed: 1.0,
                amount: 1,
                pierce: UNLIMITED_PIERCE,
            },
            WeaponKind::MagicWand => WeaponBase {
                damage: 10.0,
                cooldown: 1.0,
                area: 1.0,
                speed: 400.0,
                amount: 1,
                pierce: 1,
            },
            WeaponKind::Garlic => WeaponBase {
                damage: 5.0,
                cooldown: 0.5,
                area: 1.0,
                speed: 0.0,
                amount: 1,
                pierce: UNLIMITED_PIERCE,
            },
            WeaponKind::Axe => WeaponBase {
                damage: 25.0,
                cooldown: 2.0,
                area: 1.0,
                speed: 300.0,
                amount: 1,
                pierce: UNLIMITED_PIERCE,
            },
            WeaponKind::Knife => WeaponBase {
                damage: 8.0,
                cooldown: 0.3,
                area: 1.0,
                speed: 500.0,
                amount: 1,
                pierce: 1,
            },
        }
    }

    /// Per-level growth
    pub fn scaling(self) -> WeaponScaling {
        match self {
            WeaponKind::Whip => WeaponScaling {
                damage: 5.0,
                cooldown: -0.1,
                area: 0.1,
                amount: 0,
            },
            WeaponKind::MagicWand => WeaponScaling {
                damage: 3.0,
                cooldown: -0.08,
                area: 0.0,
                amount: 1,
            },
            WeaponKind::Garlic => WeaponScaling {
                damage: 2.0,
                cooldown: -0.03,
                area: 0.15,
                amount: 0,
            },
            WeaponKind::Axe => WeaponScaling {
                damage: 8.0,
                cooldown: -0.12,
                area: 0.1,
                amount: 1,
            },
            WeaponKind::Knife => WeaponScaling {
                damage: 2.0,
                cooldown: -0.02,
                area: 0.0,
                amount: 1,
            },
        }
    }

    /// Evolved form, if this weapon has one
    pub fn evolution(self) -> Option<Evolution> {
        match self {
            WeaponKind::Whip => Some(Evolution {
                name: "Bloody Whip",
                requires: PassiveKind::Spinach,
                damage_multiplier: 2.0,
                effect: EvolutionEffect::Lifesteal,
            }),
            WeaponKind::MagicWand => Some(Evolution {
                name: "Holy Wand",
                requires: PassiveKind::EmptyTome,
                damage_multiplier: 1.5,
                effect: EvolutionEffect::Homing,
            }),
            WeaponKind::Garlic => Some(Evolution {
                name: "Soul Eater",
                requires: PassiveKind::Pummarola,
                damage_multiplier: 1.8,
                effect: EvolutionEffect::Lifesteal,
            }),
            WeaponKind::Axe | WeaponKind::Knife => None,
        }
    }
}

/// Passive item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveKind {
    /// Might
    Spinach,
    /// Max HP
    HollowHeart,
    /// Regeneration
    Pummarola,
    /// Pickup radius
    Attractorb,
    /// Armor
    Armor,
    /// Move speed
    Wings,
    /// Cooldown reduction
    EmptyTome,
}

impl PassiveKind {
    /// Every passive in offer order
    pub const ALL: [PassiveKind; 7] = [
        PassiveKind::Spinach,
        PassiveKind::HollowHeart,
        PassiveKind::Pummarola,
        PassiveKind::Attractorb,
        PassiveKind::Armor,
        PassiveKind::Wings,
        PassiveKind::EmptyTome,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            PassiveKind::Spinach => "Spinach",
            PassiveKind::HollowHeart => "Hollow Heart",
            PassiveKind::Pummarola => "Pummarola",
            PassiveKind::Attractorb => "Attractorb",
            PassiveKind::Armor => "Armor",
            PassiveKind::Wings => "Wings",
            PassiveKind::EmptyTome => "Empty Tome",
        }
    }

    /// Card description
    pub fn description(self) -> &'static str {
        match self {
            PassiveKind::Spinach => "+10% Might (damage)",
            PassiveKind::HollowHeart => "+20 Max HP",
            PassiveKind::Pummarola => "+0.5 HP/s Regen",
            PassiveKind::Attractorb => "+20% Pickup Radius",
            PassiveKind::Armor => "+1 Armor (damage reduction)",
            PassiveKind::Wings => "+10% Move Speed",
            PassiveKind::EmptyTome => "-8% Cooldown",
        }
    }

    /// Stat change applied once per level
    pub fn effect(self) -> StatModifier {
        let (stat, modifier) = match self {
            PassiveKind::Spinach => (Stat::Might, Modifier::Flat(0.1)),
            PassiveKind::HollowHeart => (Stat::MaxHp, Modifier::Flat(20.0)),
            PassiveKind::Pummarola => (Stat::Regen, Modifier::Flat(0.5)),
            PassiveKind::Attractorb => (Stat::PickupRadius, Modifier::Percent(0.2)),
            PassiveKind::Armor => (Stat::Armor, Modifier::Flat(1.0)),
            PassiveKind::Wings => (Stat::MoveSpeed, Modifier::Percent(0.1)),
            PassiveKind::EmptyTome => (Stat::CooldownReduction, Modifier::Flat(0.08)),
        };
        StatModifier { stat, modifier }
    }
}

/// Enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast, weak enemy
    Chaser,
    /// Slow, strong enemy
    Tank,
    /// Small enemy spawned in groups
    Swarm,
    /// Enemy that fades in and out
    Ghost,
    /// Zigzagging flyer
    Bat,
    /// Periodic boss
    Boss,
}

/// Movement style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Straight at the player
    Chase,
    /// Straight at the player while the opacity pulses
    Phase,
    /// Toward the player with a flipping sideways drift
    Zigzag,
}

/// Enemy numbers before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyBase {
    /// Hit points
    pub hp: f32,
    /// Contact damage
    pub damage: f32,
    /// Movement speed
    pub speed: f32,
    /// Experience paid out on death
    pub xp_value: u32,
    /// Collision radius
    pub radius: f32,
    /// Relative spawn weight (0 = never picked by weight)
    pub spawn_weight: f32,
    /// Enemies created per spawn
    pub group_size: u32,
    /// Movement style
    pub behavior: Behavior,
}

impl EnemyKind {
    /// Kinds chosen by weighted regular spawning
    pub const REGULAR: [EnemyKind; 5] = [
        EnemyKind::Chaser,
        EnemyKind::Tank,
        EnemyKind::Swarm,
        EnemyKind::Ghost,
        EnemyKind::Bat,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Chaser => "Chaser",
            EnemyKind::Tank => "Tank",
            EnemyKind::Swarm => "Swarm",
            EnemyKind::Ghost => "Ghost",
            EnemyKind::Bat => "Bat",
            EnemyKind::Boss => "Boss",
        }
    }

    /// Numbers before difficulty scaling
    pub fn base(self) -> EnemyBase {
        let (hp, damage, speed, xp_value, radius, spawn_weight) = match self {
            EnemyKind::Chaser => (10.0, 10.0, 80.0, 1, 16.0, 50.0),
            EnemyKind::Tank => (50.0, 20.0, 40.0, 5, 24.0, 20.0),
            EnemyKind::Swarm => (5.0, 5.0, 100.0, 1, 12.0, 30.0),
            EnemyKind::Ghost => (15.0, 15.0, 70.0, 3, 20.0, 15.0),
            EnemyKind::Bat => (8.0, 8.0, 120.0, 2, 14.0, 25.0),
            EnemyKind::Boss => (500.0, 30.0, 50.0, 50, 48.0, 0.0),
        };
        EnemyBase {
            hp,
            damage,
            speed,
            xp_value,
            radius,
            spawn_weight,
            group_size: if self == EnemyKind::Swarm { 5 } else { 1 },
            behavior: match self {
                EnemyKind::Ghost => Behavior::Phase,
                EnemyKind::Bat => Behavior::Zigzag,
                _ => Behavior::Chase,
            },
        }
    }

    /// Whether this kind is a boss
    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// Experience gem tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GemTier {
    /// Worth 1
    Small,
    /// Worth 5
    Medium,
    /// Worth 25
    Large,
}

impl GemTier {
    /// Largest tier first
    pub const DESCENDING: [GemTier; 3] = [GemTier::Large, GemTier::Medium, GemTier::Small];

    /// Experience carried by one gem
    pub fn value(self) -> u32 {
        match self {
            GemTier::Small => 1,
            GemTier::Medium => 5,
            GemTier::Large => 25,
        }
    }

    /// Split an experience amount into the fewest gems
    pub fn split(mut xp: u32) -> Vec<GemTier> {
        let mut gems = Vec::new();
        for tier in Self::DESCENDING {
            while xp >= tier.value() {
                xp -= tier.value();
                gems.push(tier);
            }
        }
        gems
    }
}
