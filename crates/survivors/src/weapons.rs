//! Weapon system: inventory, level tables and firing patterns

use rand::Rng;
use survivor_engine::foundation::math::{normalize_or_zero, rotate_degrees, Vec2};
use survivor_engine::foundation::time::Cooldown;

use crate::catalog::{
    EvolutionEffect, PassiveKind, WeaponKind, MAX_PASSIVES, MAX_PASSIVE_LEVEL, MAX_WEAPONS,
    MAX_WEAPON_LEVEL,
};
use crate::error::{GameError, GameResult};
use crate::projectile::{Aura, Motion, Projectile, Shape};
use crate::registry::EnemyId;
use crate::stats::StatBlock;

/// Minimum weapon interval before cooldown reduction
pub const MIN_COOLDOWN: f32 = 0.1;
/// Garlic aura radius at area 1.0
pub const GARLIC_RADIUS: f32 = 60.0;
/// Whip slash length at area 1.0
pub const WHIP_LENGTH: f32 = 100.0;
/// Whip slash thickness at area 1.0
pub const WHIP_HEIGHT: f32 = 30.0;
/// Gap between the player and the slash
pub const WHIP_OFFSET: f32 = 40.0;
/// Whip slash lifetime
pub const WHIP_LIFETIME: f32 = 0.2;
/// Degrees between wand bolts
pub const WAND_SPREAD: f32 = 15.0;
/// Degrees between knives
pub const KNIFE_SPREAD: f32 = 10.0;
/// Axe throw jitter either side of facing (degrees)
pub const AXE_JITTER: f32 = 60.0;
/// Axe launch speed upward
pub const AXE_LAUNCH: f32 = -300.0;
/// Axe gravity
pub const AXE_GRAVITY: f32 = 400.0;

/// Resolved numbers for a weapon at its level, with player stats applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponParams {
    /// Damage per hit, might and evolution included
    pub damage: f32,
    /// Seconds between attacks, cooldown reduction included
    pub cooldown: f32,
    /// Area multiplier
    pub area: f32,
    /// Projectile speed
    pub speed: f32,
    /// Projectiles per attack
    pub amount: u32,
    /// Hits per projectile
    pub pierce: u32,
    /// Size growth from level (1.0 at level 1, 3.0 at max)
    pub size: f32,
}

impl WeaponParams {
    /// Resolve the level table for `kind` at `level`
    pub fn resolve(kind: WeaponKind, level: u32, evolved: bool, stats: &StatBlock) -> Self {
        let base = kind.base();
        let scaling = kind.scaling();
        let steps = level.clamp(1, MAX_WEAPON_LEVEL) - 1;
        let bonus = steps as f32;

        let mut damage = (base.damage + scaling.damage * bonus) * stats.might;
        if evolved {
            if let Some(evolution) = kind.evolution() {
                damage *= evolution.damage_multiplier;
            }
        }

        Self {
            damage,
            cooldown: (base.cooldown + scaling.cooldown * bonus).max(MIN_COOLDOWN) * stats.cooldown_factor(),
            area: base.area + scaling.area * bonus,
            speed: base.speed,
            amount: base.amount + (steps / 2) * scaling.amount,
            pierce: base.pierce,
            size: 1.0 + bonus / (MAX_WEAPON_LEVEL - 1) as f32 * 2.0,
        }
    }
}

/// An equipped weapon
#[derive(Debug, Clone)]
pub struct Weapon {
    /// Weapon kind
    pub kind: WeaponKind,
    /// Level 1..=8
    pub level: u32,
    /// Whether the weapon has evolved
    pub evolved: bool,
    cooldown: Cooldown,
    params: WeaponParams,
    aura: Option<Aura>,
}

impl Weapon {
    /// A new level-1 weapon, ready to fire
    pub fn new(kind: WeaponKind, stats: &StatBlock) -> Self {
        let params = WeaponParams::resolve(kind, 1, false, stats);
        let aura = (kind == WeaponKind::Garlic).then(Aura::default);
        let mut weapon = Self {
            kind,
            level: 1,
            evolved: false,
            cooldown: Cooldown::new(params.cooldown),
            params,
            aura,
        };
        weapon.refresh(stats);
        weapon
    }

    /// Current resolved numbers
    pub fn params(&self) -> &WeaponParams {
        &self.params
    }

    /// Display name, evolved form included
    pub fn name(&self) -> &'static str {
        match self.kind.evolution() {
            Some(evolution) if self.evolved => evolution.name,
            _ => self.kind.name(),
        }
    }

    /// Whether hits from this weapon heal the player
    pub fn lifesteal(&self) -> bool {
        self.evolved
            && self
                .kind
                .evolution()
                .is_some_and(|e| e.effect == EvolutionEffect::Lifesteal)
    }

    fn homing(&self) -> bool {
        self.evolved
            && self
                .kind
                .evolution()
                .is_some_and(|e| e.effect == EvolutionEffect::Homing)
    }

    /// Garlic's aura, if this weapon has one
    pub fn aura(&self) -> Option<&Aura> {
        self.aura.as_ref()
    }

    /// Mutable aura access for the damage resolver
    pub fn aura_mut(&mut self) -> Option<&mut Aura> {
        self.aura.as_mut()
    }

    /// Cooldown progress toward the next attack (1.0 = ready)
    pub fn readiness(&self) -> f32 {
        self.cooldown.progress()
    }

    /// Recompute numbers after a level, evolution or stat change
    ///
    /// Cooldown progress is kept; a shorter interval applies immediately.
    pub fn refresh(&mut self, stats: &StatBlock) {
        self.params = WeaponParams::resolve(self.kind, self.level, self.evolved, stats);
        self.cooldown.set_interval(self.params.cooldown);
        let params = self.params;
        let lifesteal = self.lifesteal();
        if let Some(aura) = self.aura.as_mut() {
            aura.radius = GARLIC_RADIUS * params.area * params.size;
            aura.damage = params.damage;
            aura.interval = params.cooldown;
            aura.lifesteal = lifesteal;
        }
    }

    /// Whether the weapon could take another level
    pub fn can_level(&self) -> bool {
        self.level < MAX_WEAPON_LEVEL
    }

    /// Advance the cooldown and emit projectiles when it expires
    pub fn fire(&mut self, dt: f32, ctx: &FireContext, rng: &mut impl Rng) -> Vec<Projectile> {
        // The aura deals damage on its own per-enemy ticks
        if self.aura.is_some() || !self.cooldown.tick(dt) {
            return Vec::new();
        }

        let p = self.params;
        let lifesteal = self.lifesteal();
        let shots: Vec<Projectile> = match self.kind {
            WeaponKind::Whip => (0..p.amount)
                .map(|i| {
                    // Horizontal slash, alternating sides for extra lashes
                    let facing_right = ctx.facing.x >= 0.0;
                    let right = if i % 2 == 0 { facing_right } else { !facing_right };
                    let width = WHIP_LENGTH * p.area * p.size;
                    let side = if right { 1.0 } else { -1.0 };
                    let center = ctx.origin + Vec2::new(side * (WHIP_OFFSET + width * 0.5), 0.0);
                    Projectile::new(
                        self.kind,
                        center,
                        Motion::Stationary,
                        Shape::Box(Vec2::new(width, WHIP_HEIGHT * p.area)),
                        p.damage,
                        WHIP_LIFETIME,
                        p.pierce,
                    )
                })
                .collect(),
            WeaponKind::MagicWand => {
                let aim = ctx
                    .nearest_enemy
                    .map_or(ctx.facing, |(_, pos)| normalize_or_zero(pos - ctx.origin));
                let aim = if aim == Vec2::zeros() { ctx.facing } else { aim };
                let half = (p.amount / 2) as f32;
                (0..p.amount)
                    .map(|i| {
                        let direction = if p.amount > 1 {
                            rotate_degrees(aim, (i as f32 - half) * WAND_SPREAD)
                        } else {
                            aim
                        };
                        let motion = if self.homing() {
                            Motion::Homing {
                                direction,
                                speed: p.speed,
                                target: ctx.nearest_enemy.map(|(id, _)| id),
                            }
                        } else {
                            Motion::Linear {
                                velocity: direction * p.speed,
                            }
                        };
                        Projectile::new(
                            self.kind,
                            ctx.origin,
                            motion,
                            Shape::Circle(6.0 * p.size),
                            p.damage,
                            3.0,
                            p.pierce,
                        )
                    })
                    .collect()
            }
            WeaponKind::Axe => (0..p.amount)
                .map(|i| {
                    let mut direction = rotate_degrees(ctx.facing, rng.gen_range(-AXE_JITTER..=AXE_JITTER));
                    if p.amount > 1 {
                        direction.x = if i % 2 == 0 { direction.x.abs() } else { -direction.x.abs() };
                    }
                    Projectile::new(
                        self.kind,
                        ctx.origin,
                        Motion::Ballistic {
                            horizontal: direction.x * p.speed,
                            vertical: AXE_LAUNCH,
                            gravity: AXE_GRAVITY,
                        },
                        Shape::Circle(12.0 * p.size),
                        p.damage,
                        3.0,
                        p.pierce,
                    )
                })
                .collect(),
            WeaponKind::Knife => {
                let spread = KNIFE_SPREAD * (p.amount.saturating_sub(1)) as f32;
                (0..p.amount)
                    .map(|i| {
                        let direction = if p.amount > 1 {
                            let step = spread / (p.amount - 1) as f32;
                            rotate_degrees(ctx.facing, -spread / 2.0 + step * i as f32)
                        } else {
                            ctx.facing
                        };
                        Projectile::new(
                            self.kind,
                            ctx.origin,
                            Motion::Linear {
                                velocity: direction * p.speed,
                            },
                            Shape::Circle(5.0 * p.size),
                            p.damage,
                            2.0,
                            p.pierce,
                        )
                    })
                    .collect()
            }
            WeaponKind::Garlic => Vec::new(),
        };

        shots.into_iter().map(|s| s.with_lifesteal(lifesteal)).collect()
    }
}

/// What a weapon needs to know to fire
#[derive(Debug, Clone, Copy)]
pub struct FireContext {
    /// Player position
    pub origin: Vec2,
    /// Player facing (unit)
    pub facing: Vec2,
    /// Closest living enemy, if any
    pub nearest_enemy: Option<(EnemyId, Vec2)>,
}

/// An owned passive item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passive {
    /// Passive kind
    pub kind: PassiveKind,
    /// Level 1..=5
    pub level: u32,
}

/// Weapon and passive inventory
#[derive(Debug, Clone, Default)]
pub struct Arsenal {
    weapons: Vec<Weapon>,
    passives: Vec<Passive>,
}

impl Arsenal {
    /// Empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Equipped weapons in acquisition order
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    /// Mutable access for the damage resolver
    pub fn weapons_mut(&mut self) -> &mut [Weapon] {
        &mut self.weapons
    }

    /// Owned passives in acquisition order
    pub fn passives(&self) -> &[Passive] {
        &self.passives
    }

    /// Equipped weapon of `kind`
    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind == kind)
    }

    /// Level of an owned passive
    pub fn passive_level(&self, kind: PassiveKind) -> Option<u32> {
        self.passives.iter().find(|p| p.kind == kind).map(|p| p.level)
    }

    /// Whether another weapon fits
    pub fn has_weapon_slot(&self) -> bool {
        self.weapons.len() < MAX_WEAPONS
    }

    /// Whether another passive fits
    pub fn has_passive_slot(&self) -> bool {
        self.passives.len() < MAX_PASSIVES
    }

    /// Equip a new level-1 weapon
    pub fn add_weapon(&mut self, kind: WeaponKind, stats: &StatBlock) -> GameResult<()> {
        if self.weapon(kind).is_some() {
            return self.level_weapon(kind, stats).map(|_| ());
        }
        if !self.has_weapon_slot() {
            return Err(GameError::WeaponSlotsFull);
        }
        log::debug!("Equipped {}", kind.name());
        self.weapons.push(Weapon::new(kind, stats));
        Ok(())
    }

    /// Raise an equipped weapon one level; returns the new level
    pub fn level_weapon(&mut self, kind: WeaponKind, stats: &StatBlock) -> GameResult<u32> {
        let weapon = self.weapon_mut(kind).ok_or(GameError::WeaponNotOwned(kind))?;
        if !weapon.can_level() {
            return Err(GameError::WeaponMaxLevel(kind));
        }
        weapon.level += 1;
        weapon.refresh(stats);
        log::debug!("{} -> level {}", kind.name(), weapon.level);
        Ok(weapon.level)
    }

    /// Add a passive or raise it a level; returns the new level
    ///
    /// The caller applies the passive's stat change and then calls `refresh`.
    pub fn add_passive(&mut self, kind: PassiveKind) -> GameResult<u32> {
        if let Some(passive) = self.passives.iter_mut().find(|p| p.kind == kind) {
            if passive.level >= MAX_PASSIVE_LEVEL {
                return Err(GameError::PassiveMaxLevel(kind));
            }
            passive.level += 1;
            return Ok(passive.level);
        }
        if !self.has_passive_slot() {
            return Err(GameError::PassiveSlotsFull);
        }
        self.passives.push(Passive { kind, level: 1 });
        Ok(1)
    }

    /// Whether `kind` is max level, unevolved, and its paired passive is owned
    pub fn can_evolve(&self, kind: WeaponKind) -> bool {
        let Some(evolution) = kind.evolution() else {
            return false;
        };
        self.weapon(kind)
            .is_some_and(|w| !w.evolved && w.level >= MAX_WEAPON_LEVEL)
            && self.passive_level(evolution.requires).is_some()
    }

    /// Weapons currently eligible to evolve
    pub fn evolvable(&self) -> Vec<WeaponKind> {
        WeaponKind::ALL
            .into_iter()
            .filter(|kind| self.can_evolve(*kind))
            .collect()
    }

    /// Evolve a weapon
    pub fn evolve(&mut self, kind: WeaponKind, stats: &StatBlock) -> GameResult<()> {
        if !self.can_evolve(kind) {
            return Err(GameError::CannotEvolve(kind));
        }
        let weapon = self.weapon_mut(kind).ok_or(GameError::WeaponNotOwned(kind))?;
        weapon.evolved = true;
        weapon.refresh(stats);
        log::info!("{} evolved into {}", kind.name(), weapon.name());
        Ok(())
    }

    /// Recompute every weapon after a stat change
    pub fn refresh(&mut self, stats: &StatBlock) {
        for weapon in &mut self.weapons {
            weapon.refresh(stats);
        }
    }

    /// Fire every weapon whose cooldown expires this frame
    pub fn fire(&mut self, dt: f32, ctx: &FireContext, rng: &mut impl Rng) -> Vec<Projectile> {
        let mut shots = Vec::new();
        for weapon in &mut self.weapons {
            shots.extend(weapon.fire(dt, ctx, rng));
        }
        shots
    }
}
